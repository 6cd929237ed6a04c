// Server loop module
// Accepts connections until a shutdown signal arrives

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config;
use crate::logger;

/// Accept connections and serve each on its own local task
///
/// Must run inside a `LocalSet`. Returns once `shutdown` resolves; connections
/// already being served are dropped with the runtime.
pub async fn start_server_loop<S>(listener: TcpListener, state: Arc<config::AppState>, shutdown: S)
where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _peer_addr)) => handle_connection(stream, Arc::clone(&state)),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => {
                logger::log_server_stopped();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppState, Config, SiteConfig};
    use crate::server::listener::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn test_serves_over_tcp_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "0123456789").unwrap();

        let mut config = Config::load_from("definitely-missing-devserver-config").unwrap();
        config.site = SiteConfig {
            root_dir: dir.path().to_path_buf(),
            ..SiteConfig::default()
        };
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(&config).unwrap());

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let server = tokio::task::spawn_local(start_server_loop(listener, state, async move {
                    let _ = stop_rx.await;
                }));

                let mut stream = TcpStream::connect(addr).await.unwrap();
                stream
                    .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
                    .await
                    .unwrap();
                let mut raw = String::new();
                stream.read_to_string(&mut raw).await.unwrap();

                assert!(raw.starts_with("HTTP/1.1 200 OK"));
                assert!(raw.to_ascii_lowercase().contains("content-security-policy: frame-ancestors 'self'"));
                assert!(raw.ends_with("0123456789"));

                stop_tx.send(()).unwrap();
                server.await.unwrap();
            })
            .await;
    }
}
