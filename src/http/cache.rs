//! HTTP cache control module
//!
//! Decides the `Cache-Control` directive attached to served files.

/// One year, the longest max-age browsers honour
const ONE_YEAR_SECS: u32 = 31_536_000;

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Fingerprinted bundle output, never revalidated
    Immutable(u32),
    /// No directive, browser heuristics apply
    #[default]
    Unspecified,
}

impl CachePolicy {
    /// Policy for a file with the given extension
    pub fn for_extension(extension: Option<&str>) -> Self {
        match extension {
            Some("js" | "css") => Self::Immutable(ONE_YEAR_SECS),
            _ => Self::Unspecified,
        }
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> Option<String> {
        match self {
            Self::Immutable(max_age) => Some(format!("public, max-age={max_age}, immutable")),
            Self::Unspecified => None,
        }
    }
}
