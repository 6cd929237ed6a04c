// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub tunnel: TunnelConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// What the dev server serves and which headers it attaches
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Bundler output directory
    pub root_dir: PathBuf,
    /// File served for `/` and for directories
    pub index_file: String,
    /// Bundle served when a `.js` file (or `/`) is missing
    pub fallback_bundle: String,
    /// Paths always answered with 404, even if the file exists
    pub blocked_paths: Vec<String>,
    /// Origins allowed to frame the widget (`frame-ancestors`)
    pub csp_allowlist: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Request line format: `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_log_format() -> String {
    "text".to_string()
}

/// Tunnel launcher configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TunnelConfig {
    /// Tunnel CLI executable
    pub program: String,
    /// Arguments passed before the local URL
    pub args: Vec<String>,
    pub probe_attempts: u32,
    pub probe_interval_ms: u64,
    pub probe_timeout_ms: u64,
    /// Delay before warning that no public URL showed up
    pub url_warning_secs: u64,
    /// Path appended to the public URL in the banner
    pub bundle_path: String,
}

/// Platform origins allowed to embed the widget in an iframe
pub const DEFAULT_CSP_ALLOWLIST: &[&str] = &[
    "*.mitiendanube.com:*",
    "*.lojavirtualnuvem.com.br:*",
    "cirrus.tiendanube.com:*",
    "*.tiendanube.com:*",
    "*.nuvemshop.com.br:*",
    "tn.panel.vici.la",
    "platform.twitter.com:*",
    "ct.pinterest.com:*",
    "*.pintergration.com:*",
    "bat.bing.com:*",
    "dev.visualwebsiteoptimizer.com:*",
    "*.doubleclick.net:*",
    "*.getbeamer.com:*",
    "*.myperfit.net:*",
    "*.mercadolibre.com:*",
    "*.cloudflare.com:*",
];

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("dist"),
            index_file: "index.html".to_string(),
            fallback_bundle: "main.min.js".to_string(),
            blocked_paths: vec!["/manifest.json".to_string()],
            csp_allowlist: DEFAULT_CSP_ALLOWLIST
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec![
                "-y".to_string(),
                "cloudflared".to_string(),
                "tunnel".to_string(),
                "--url".to_string(),
            ],
            probe_attempts: 10,
            probe_interval_ms: 1000,
            probe_timeout_ms: 1000,
            url_warning_secs: 5,
            bundle_path: "/main.min.js".to_string(),
        }
    }
}
