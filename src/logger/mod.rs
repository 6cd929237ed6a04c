//! Logger module
//!
//! Provides logging utilities for the dev server and tunnel launcher:
//! - Server lifecycle logging
//! - Request logging (text or JSON)
//! - Tunnel launcher progress and warnings
//! - File-based logging support

mod format;
pub mod writer;

pub use format::RequestLogEntry;

use crate::config::Config;
use hyper::Method;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::OnceLock;

/// Request log format, fixed at init
static REQUEST_FORMAT: OnceLock<String> = OnceLock::new();

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let _ = REQUEST_FORMAT.set(config.logging.format.clone());
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    write_info("======================================");
    write_info("Dev server started successfully");
    write_info(&format!("Listening on: http://{addr}/"));
    write_info(&format!("Serving: {}", root.display()));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_server_stopped() {
    write_info("[Shutdown] Dev server stopped");
}

/// Log an incoming request in the configured format
pub fn log_request(method: &Method, path: &str) {
    let entry = RequestLogEntry::new(method.to_string(), path.to_string());
    let format = REQUEST_FORMAT.get().map_or("text", String::as_str);
    write_info(&entry.format(format));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_info(message: &str) {
    write_info(message);
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

// ============================================
// Tunnel launcher
// ============================================

pub fn log_tunnel_intro(bundle_path: &str) {
    write_info("\n[Tunnel] Starting public tunnel...");
    write_info(&format!(
        "[Tunnel] Use the JavaScript URL ({bundle_path}) in the platform, not the root URL"
    ));
    write_info("[Tunnel] Waiting for the local server...\n");
}

pub fn log_probe_ready() {
    write_info("[Tunnel] Local server is responding\n");
}

pub fn log_probe_exhausted(attempts: u32) {
    log_warning(&format!(
        "Local server did not answer after {attempts} attempts, starting the tunnel anyway"
    ));
}

/// Print the discovered public URL and the bundle URL to paste into the platform
pub fn log_tunnel_url(url: &str, bundle_path: &str) {
    let rule = "=".repeat(60);
    write_info(&format!("\n{rule}"));
    write_info("Public URL ready");
    write_info(&rule);
    write_info(&format!("Base URL:   {url}"));
    write_info(&format!("Bundle URL: {url}{bundle_path}"));
    write_info("");
    write_info("Use this URL in the platform:");
    write_info(&format!("   {url}{bundle_path}"));
    write_info(&rule);
    write_info("\nPress Ctrl+C to stop the tunnel\n");
}

pub fn log_tunnel_url_missing() {
    log_warning("Public URL not detected yet, check the tunnel output above");
    write_error("       The URL usually follows \"Registered tunnel connection\"");
    write_error("       Look for a line containing \"trycloudflare.com\"\n");
}

pub fn log_tunnel_exit(code: Option<i32>) {
    match code {
        Some(code) if code != 0 => log_error(&format!("Tunnel exited with code {code}")),
        _ => write_info("\n[Tunnel] Tunnel closed"),
    }
}
