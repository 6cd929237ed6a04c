//! Tunnel launcher
//!
//! Waits for the dev server, spawns the tunnel CLI, mirrors its output and
//! reports the public URL it announces. The child's exit code becomes ours.

use std::fmt;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use super::probe::{wait_for_server, ProbeOutcome, ProbeSettings};
use super::scanner::{DiscoveredUrl, LineScanner};
use crate::config::{Config, TunnelConfig};
use crate::logger;
use crate::server;

/// How long stream pumps may keep draining after the child exits
const DRAIN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("invalid probe URL '{url}': {source}")]
    ProbeUrl {
        url: String,
        #[source]
        source: hyper::http::uri::InvalidUri,
    },

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for the tunnel process: {0}")]
    Wait(#[from] io::Error),
}

/// Launcher progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    WaitingForLocalServer,
    TunnelStarting,
    UrlDiscovered,
}

impl fmt::Display for LaunchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForLocalServer => write!(f, "waiting for local server"),
            Self::TunnelStarting => write!(f, "tunnel starting"),
            Self::UrlDiscovered => write!(f, "url discovered"),
        }
    }
}

pub struct TunnelLauncher {
    settings: TunnelConfig,
    local_url: String,
    probe: ProbeSettings,
    discovered: Arc<DiscoveredUrl>,
}

impl TunnelLauncher {
    pub fn new(config: &Config) -> Result<Self, LaunchError> {
        let probe = ProbeSettings::from_config(config).map_err(|source| LaunchError::ProbeUrl {
            url: config.probe_url(),
            source,
        })?;

        Ok(Self {
            settings: config.tunnel.clone(),
            local_url: config.local_url(),
            probe,
            discovered: Arc::new(DiscoveredUrl::default()),
        })
    }

    /// Shared handle to the URL captured from the tunnel output
    pub fn discovered_url(&self) -> Arc<DiscoveredUrl> {
        Arc::clone(&self.discovered)
    }

    /// Tunnel CLI invocation; the local URL is the last argument
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.settings.program);
        cmd.args(&self.settings.args)
            .arg(&self.local_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Run until the tunnel process exits or Ctrl+C; returns the exit code
    pub async fn run(self) -> Result<i32, LaunchError> {
        logger::log_tunnel_intro(&self.settings.bundle_path);
        log_phase(LaunchPhase::WaitingForLocalServer);

        match wait_for_server(&self.probe).await {
            ProbeOutcome::Ready { .. } => logger::log_probe_ready(),
            ProbeOutcome::Exhausted { attempts } => logger::log_probe_exhausted(attempts),
        }

        let mut child = self.command().spawn().map_err(|source| LaunchError::Spawn {
            program: self.settings.program.clone(),
            source,
        })?;
        log_phase(LaunchPhase::TunnelStarting);

        let mut pumps = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            pumps.push(self.spawn_pump(stdout, tokio::io::stdout()));
        }
        if let Some(stderr) = child.stderr.take() {
            pumps.push(self.spawn_pump(stderr, tokio::io::stderr()));
        }

        let warning = tokio::spawn(warn_if_silent(
            self.discovered_url(),
            Duration::from_secs(self.settings.url_warning_secs),
        ));

        let code = tokio::select! {
            status = child.wait() => exit_code(status?),
            () = server::interrupt() => {
                forward_interrupt(&mut child);
                child.wait().await?;
                0
            }
        };

        warning.abort();
        for pump in pumps {
            // npx may leave grandchildren holding the pipes open
            match tokio::time::timeout(DRAIN_GRACE, pump).await {
                Ok(Ok(Ok(()))) | Err(_) => {}
                Ok(Ok(Err(e))) => {
                    logger::log_warning(&format!("Failed reading tunnel output: {e}"));
                }
                Ok(Err(e)) => logger::log_warning(&format!("Tunnel output task failed: {e}")),
            }
        }

        logger::log_tunnel_exit(Some(code));
        Ok(code)
    }

    fn spawn_pump<R, W>(&self, source: R, sink: W) -> JoinHandle<io::Result<()>>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        tokio::spawn(pump(
            source,
            sink,
            self.discovered_url(),
            self.settings.bundle_path.clone(),
        ))
    }
}

/// Copy one output stream to `sink` while scanning it for the public URL
///
/// A failing sink stops the mirroring but not the reading: the child's pipe
/// is drained until EOF so it never blocks on a full buffer.
pub async fn pump<R, W>(
    mut source: R,
    mut sink: W,
    discovered: Arc<DiscoveredUrl>,
    bundle_path: String,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut scanner = LineScanner::default();
    let mut buf = vec![0u8; 8192];
    let mut mirroring = true;

    loop {
        let n = source.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }

        if mirroring {
            if let Err(e) = mirror(&mut sink, &buf[..n]).await {
                logger::log_warning(&format!("Stopped mirroring tunnel output: {e}"));
                mirroring = false;
            }
        }

        if discovered.get().is_some() {
            continue;
        }

        if let Some(url) = scanner.push(&buf[..n]) {
            if discovered.capture(url) {
                log_phase(LaunchPhase::UrlDiscovered);
                if let Some(url) = discovered.get() {
                    logger::log_tunnel_url(url, &bundle_path);
                }
            }
        }
    }
}

async fn mirror<W: AsyncWrite + Unpin>(sink: &mut W, bytes: &[u8]) -> io::Result<()> {
    sink.write_all(bytes).await?;
    sink.flush().await
}

/// After `delay`, warn if no URL was captured; true if it warned
async fn warn_if_silent(discovered: Arc<DiscoveredUrl>, delay: Duration) -> bool {
    tokio::time::sleep(delay).await;
    let silent = discovered.get().is_none();
    if silent {
        logger::log_tunnel_url_missing();
    }
    silent
}

fn log_phase(phase: LaunchPhase) {
    logger::log_info(&format!("[Tunnel] {phase}"));
}

/// A child killed by a signal has no code and counts as a clean close
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(0)
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn forward_interrupt(child: &mut Child) {
    let Some(pid) = child.id().and_then(|id| libc::pid_t::try_from(id).ok()) else {
        return;
    };

    // SAFETY: kill(2) takes no pointers; `pid` is our own child, not yet reaped
    let rc = unsafe { libc::kill(pid, libc::SIGINT) };
    if rc != 0 {
        logger::log_warning("Failed to forward SIGINT, killing the tunnel process");
        let _ = child.start_kill();
    }
}

#[cfg(not(unix))]
fn forward_interrupt(child: &mut Child) {
    let _ = child.start_kill();
}
