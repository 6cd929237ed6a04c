use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use storefront_devserver::config::{self, AppState, Config};
use storefront_devserver::{logger, scaffold, server};

/// Serve the widget's bundler output for local development
#[derive(Parser, Debug)]
#[command(name = "devserver", version)]
struct Cli {
    /// Config file path (without extension)
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory to serve
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Write index.html, app.html and manifest.json into the root and exit
    #[arg(long)]
    init: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)?.with_overrides(cli.port, cli.root);
    logger::init(&cfg)?;

    if cli.init {
        for path in scaffold::write_scaffold(&cfg.site)? {
            logger::log_info(&format!("[INIT] Wrote {}", path.display()));
        }
        return Ok(());
    }

    // Create Tokio runtime, thread count from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::new(&cfg)?);
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&listener.local_addr()?, state.resolver.root(), &cfg);
    if !state.resolver.root().is_dir() {
        logger::log_warning(&format!(
            "Site root {} does not exist yet; run the bundler or `devserver --init`",
            state.resolver.root().display()
        ));
    }

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            server::shutdown_signal(),
        ))
        .await;
    Ok(())
}
