//! Local server readiness probe
//!
//! Issues `HEAD` requests until the dev server answers or the attempts run
//! out. Failures are soft: the caller starts the tunnel either way.

use http_body_util::Empty;
use hyper::body::Bytes;
use hyper::http::uri::InvalidUri;
use hyper::{Request, Uri};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

use crate::config::Config;

/// How to probe the dev server
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub uri: Uri,
    pub attempts: u32,
    pub interval: Duration,
    pub timeout: Duration,
}

impl ProbeSettings {
    pub fn from_config(config: &Config) -> Result<Self, InvalidUri> {
        Ok(Self {
            uri: config.probe_url().parse()?,
            attempts: config.tunnel.probe_attempts,
            interval: Duration::from_millis(config.tunnel.probe_interval_ms),
            timeout: Duration::from_millis(config.tunnel.probe_timeout_ms),
        })
    }
}

/// Result of waiting for the dev server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Answered on this attempt (1-based)
    Ready { attempt: u32 },
    /// Never answered within the configured attempts
    Exhausted { attempts: u32 },
}

/// Probe until any HTTP response arrives
///
/// Each attempt is bounded by `timeout`; a timed-out attempt drops its
/// connection. Attempts are spaced by `interval`.
pub async fn wait_for_server(settings: &ProbeSettings) -> ProbeOutcome {
    let client = Client::builder(TokioExecutor::new()).build_http::<Empty<Bytes>>();

    for attempt in 1..=settings.attempts {
        let Ok(request) = Request::head(settings.uri.clone()).body(Empty::new()) else {
            break;
        };

        let attempt_result = tokio::time::timeout(settings.timeout, client.request(request)).await;
        if let Ok(Ok(_response)) = attempt_result {
            return ProbeOutcome::Ready { attempt };
        }

        if attempt < settings.attempts {
            tokio::time::sleep(settings.interval).await;
        }
    }

    ProbeOutcome::Exhausted {
        attempts: settings.attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn settings_for(port: u16, attempts: u32) -> ProbeSettings {
        ProbeSettings {
            uri: format!("http://127.0.0.1:{port}/").parse().unwrap(),
            attempts,
            interval: Duration::from_millis(10),
            timeout: Duration::from_millis(200),
        }
    }

    #[tokio::test]
    async fn test_ready_on_any_response() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            stream
                .write_all(b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\n\r\n")
                .await
                .unwrap();
        });

        let outcome = wait_for_server(&settings_for(port, 3)).await;
        assert_eq!(outcome, ProbeOutcome::Ready { attempt: 1 });
    }

    #[tokio::test]
    async fn test_exhausted_when_nothing_listens() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let outcome = wait_for_server(&settings_for(port, 2)).await;
        assert_eq!(outcome, ProbeOutcome::Exhausted { attempts: 2 });
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let outcome = wait_for_server(&settings_for(port, 2)).await;
        assert_eq!(outcome, ProbeOutcome::Exhausted { attempts: 2 });
    }

    #[tokio::test]
    async fn test_zero_attempts() {
        let outcome = wait_for_server(&settings_for(1, 0)).await;
        assert_eq!(outcome, ProbeOutcome::Exhausted { attempts: 0 });
    }
}
