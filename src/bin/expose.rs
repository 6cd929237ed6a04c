use clap::Parser;
use std::process::ExitCode;

use storefront_devserver::config::{self, Config};
use storefront_devserver::logger;
use storefront_devserver::tunnel::TunnelLauncher;

/// Expose the local dev server through a public tunnel
#[derive(Parser, Debug)]
#[command(name = "expose", version)]
struct Cli {
    /// Config file path (without extension)
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Port of the local dev server
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<i32, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)?.with_overrides(cli.port, None);
    logger::init(&cfg)?;

    let launcher = TunnelLauncher::new(&cfg)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    Ok(runtime.block_on(launcher.run())?)
}
