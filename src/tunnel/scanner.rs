//! Public URL discovery in tunnel CLI output
//!
//! The tunnel tool has no structured protocol; its announced URL is found by
//! plain pattern matching over the text it prints.

use regex::Regex;
use std::sync::{LazyLock, OnceLock};

static TUNNEL_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[a-zA-Z0-9-]+\.trycloudflare\.com").unwrap());

/// First tunnel URL in `text`, if any
pub fn extract_url(text: &str) -> Option<&str> {
    TUNNEL_URL.find(text).map(|m| m.as_str())
}

/// Line buffer over one output stream
///
/// Chunks are raw bytes split on `\n`; complete lines are scanned first, then
/// the incomplete tail, which is kept undecoded for the next chunk so a
/// character split across reads survives intact.
#[derive(Debug, Default)]
pub struct LineScanner {
    pending: Vec<u8>,
}

impl LineScanner {
    /// Append a chunk and return the first URL it completes or contains
    pub fn push(&mut self, chunk: &[u8]) -> Option<String> {
        self.pending.extend_from_slice(chunk);

        let mut found = None;
        if let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') {
            let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();
            found = complete.split(|&b| b == b'\n').find_map(scan);
        }

        found.or_else(|| scan(&self.pending))
    }
}

fn scan(bytes: &[u8]) -> Option<String> {
    extract_url(&String::from_utf8_lossy(bytes)).map(str::to_string)
}

/// Write-once holder for the discovered URL
#[derive(Debug, Default)]
pub struct DiscoveredUrl(OnceLock<String>);

impl DiscoveredUrl {
    /// Store `url` unless one was captured already; true if this call stored it
    pub fn capture(&self, url: String) -> bool {
        self.0.set(url).is_ok()
    }

    pub fn get(&self) -> Option<&str> {
        self.0.get().map(String::as_str)
    }
}
