//! Tunnel launcher module
//!
//! Exposes the dev server through a third-party tunnelling CLI.

pub mod launcher;
pub mod probe;
pub mod scanner;

pub use launcher::{LaunchError, LaunchPhase, TunnelLauncher};
pub use probe::{wait_for_server, ProbeOutcome, ProbeSettings};
pub use scanner::{extract_url, DiscoveredUrl, LineScanner};
