//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! request routing in `handler`.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use headers::SiteHeaders;
pub use response::{
    build_403_response, build_404_response, build_500_response, build_blocked_response,
    build_file_response, build_options_response,
};
