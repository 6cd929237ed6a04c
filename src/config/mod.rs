// Configuration module entry point
// Loads the layered configuration once at start-up

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

// Re-export public types
pub use state::{AppState, StateError};
pub use types::{
    Config, LoggingConfig, ServerConfig, SiteConfig, TunnelConfig, DEFAULT_CSP_ALLOWLIST,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "devserver";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// The file is optional; environment variables use the `DEVSERVER_` prefix
    /// and `__` between nested keys, e.g. `DEVSERVER_SERVER__PORT=9000`
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let site = SiteConfig::default();
        let tunnel = TunnelConfig::default();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEVSERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("site.root_dir", site.root_dir.to_string_lossy().into_owned())?
            .set_default("site.index_file", site.index_file)?
            .set_default("site.fallback_bundle", site.fallback_bundle)?
            .set_default("site.blocked_paths", site.blocked_paths)?
            .set_default("site.csp_allowlist", site.csp_allowlist)?
            .set_default("logging.access_log", true)?
            .set_default("logging.format", "text")?
            .set_default("tunnel.program", tunnel.program)?
            .set_default("tunnel.args", tunnel.args)?
            .set_default("tunnel.probe_attempts", tunnel.probe_attempts)?
            .set_default("tunnel.probe_interval_ms", tunnel.probe_interval_ms)?
            .set_default("tunnel.probe_timeout_ms", tunnel.probe_timeout_ms)?
            .set_default("tunnel.url_warning_secs", tunnel.url_warning_secs)?
            .set_default("tunnel.bundle_path", tunnel.bundle_path)?
            .build()?;

        settings.try_deserialize()
    }

    /// Apply command-line overrides on top of the loaded layers
    #[must_use]
    pub fn with_overrides(mut self, port: Option<u16>, root_dir: Option<PathBuf>) -> Self {
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(root_dir) = root_dir {
            self.site.root_dir = root_dir;
        }
        self
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        self.server
            .host
            .parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, self.server.port))
            .map_err(|e| format!("Invalid address '{}': {e}", self.server.host))
    }

    /// URL the tunnel forwards public traffic to
    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.server.port)
    }

    /// URL used to probe the dev server; wildcard hosts are probed on loopback
    pub fn probe_url(&self) -> String {
        let host = match self.server.host.parse::<IpAddr>() {
            Ok(ip) if ip.is_unspecified() => "127.0.0.1".to_string(),
            Ok(IpAddr::V6(ip)) => format!("[{ip}]"),
            _ => self.server.host.clone(),
        };
        format!("http://{host}:{}/", self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Config {
        Config::load_from("definitely-missing-devserver-config").unwrap()
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = defaults();
        assert_eq!(cfg.site.index_file, "index.html");
        assert_eq!(cfg.site.fallback_bundle, "main.min.js");
        assert_eq!(cfg.site.blocked_paths, vec!["/manifest.json".to_string()]);
        assert_eq!(cfg.site.csp_allowlist.len(), DEFAULT_CSP_ALLOWLIST.len());
        assert_eq!(cfg.tunnel.program, "npx");
        assert_eq!(cfg.tunnel.probe_attempts, 10);
        assert_eq!(cfg.logging.format, "text");
    }

    #[test]
    fn test_overrides() {
        let cfg = defaults().with_overrides(Some(9090), Some(PathBuf::from("public")));
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.site.root_dir, PathBuf::from("public"));
        assert_eq!(cfg.local_url(), "http://localhost:9090");
    }

    #[test]
    fn test_probe_url_uses_loopback_for_wildcard() {
        let mut cfg = defaults().with_overrides(Some(8081), None);
        cfg.server.host = "0.0.0.0".to_string();
        assert_eq!(cfg.probe_url(), "http://127.0.0.1:8081/");

        cfg.server.host = "::1".to_string();
        assert_eq!(cfg.probe_url(), "http://[::1]:8081/");
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = defaults().with_overrides(Some(8082), None);
        cfg.server.host = "127.0.0.1".to_string();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8082);

        cfg.server.host = "not an ip".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
