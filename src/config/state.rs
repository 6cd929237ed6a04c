// Application state module
// Runtime state built once from the loaded configuration

use super::types::Config;
use crate::handler::static_files::StaticResolver;
use crate::http::SiteHeaders;

/// Why the application state could not be built
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("cannot resolve site root: {0}")]
    Root(#[from] std::io::Error),

    #[error("invalid CSP allowlist entry: {0}")]
    Csp(#[from] hyper::header::InvalidHeaderValue),
}

/// Application state
pub struct AppState {
    pub config: Config,
    pub resolver: StaticResolver,
    pub site_headers: SiteHeaders,
    pub access_log: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, StateError> {
        let resolver = StaticResolver::new(&config.site)?;
        let site_headers = SiteHeaders::new(&config.site.csp_allowlist)?;

        Ok(Self {
            config: config.clone(),
            resolver,
            site_headers,
            access_log: config.logging.access_log,
        })
    }

    /// Whether a path is always answered with 404
    ///
    /// Paths are compared after confinement, so `//manifest.json` or
    /// `/x/../manifest.json` name the same file as `/manifest.json`.
    pub fn is_blocked(&self, path: &str) -> bool {
        let Ok(target) = self.resolver.confine(path) else {
            return false;
        };
        self.config
            .site
            .blocked_paths
            .iter()
            .filter_map(|blocked| self.resolver.confine(blocked).ok())
            .any(|blocked| blocked == target)
    }
}
