//! Request log format module
//!
//! Supports two formats:
//! - `text`: `[2026-01-01T12:00:00.000Z] GET /main.min.js`
//! - `json`: one JSON object per line

use chrono::{DateTime, SecondsFormat, Utc};

/// Request log entry, written when a request arrives
#[derive(Debug, Clone)]
pub struct RequestLogEntry {
    /// Request timestamp
    pub time: DateTime<Utc>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URI path
    pub path: String,
}

impl RequestLogEntry {
    /// Create a new entry with current timestamp
    pub fn new(method: String, path: String) -> Self {
        Self {
            time: Utc::now(),
            method,
            path,
        }
    }

    /// Format the entry; unknown formats fall back to `text`
    pub fn format(&self, format: &str) -> String {
        match format {
            "json" => self.format_json(),
            _ => self.format_text(),
        }
    }

    fn format_text(&self) -> String {
        format!(
            "[{}] {} {}",
            self.time.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.method,
            self.path
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "time": self.time.to_rfc3339_opts(SecondsFormat::Millis, true),
            "method": self.method,
            "path": self.path,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_entry() -> RequestLogEntry {
        let mut entry = RequestLogEntry::new("GET".to_string(), "/main.min.js".to_string());
        entry.time = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        entry
    }

    #[test]
    fn test_format_text() {
        let entry = create_test_entry();
        assert_eq!(
            entry.format("text"),
            "[2026-03-01T12:30:00.000Z] GET /main.min.js"
        );
    }

    #[test]
    fn test_format_json() {
        let entry = create_test_entry();
        let value: serde_json::Value = serde_json::from_str(&entry.format("json")).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["path"], "/main.min.js");
        assert_eq!(value["time"], "2026-03-01T12:30:00.000Z");
    }

    #[test]
    fn test_unknown_format_is_text() {
        let entry = create_test_entry();
        assert_eq!(entry.format("combined"), entry.format("text"));
    }

    #[test]
    fn test_json_escapes_path() {
        let entry = RequestLogEntry::new("GET".to_string(), "/a\"b".to_string());
        let value: serde_json::Value = serde_json::from_str(&entry.format("json")).unwrap();
        assert_eq!(value["path"], "/a\"b");
    }
}
