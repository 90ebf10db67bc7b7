//! prom2pushgateway - scrape a metrics endpoint and forward it to a Pushgateway
//!
//! # Usage
//! ```sh
//! SOURCE_URL=http://app:8080/metrics PUSHGATEWAY_URL=http://pushgateway:9091/metrics/job/app prom2pushgateway
//! ```
//!
//! All tunables are environment variables; see `config` for the full list.

use clap::Parser;
use prom2pushgateway::application::system::Application;
use prom2pushgateway::application::system::shutdown_service::ShutdownService;
use prom2pushgateway::config::Config;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

const REVISION: &str = match option_env!("P2P_REVISION") {
    Some(revision) => revision,
    None => "000000000000000000000000000000",
};

#[derive(Parser, Debug)]
#[command(name = "prom2pushgateway", version, about)]
struct Cli {
    /// Run a single scrape-push cycle and exit (0 on success, 1 on failure)
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!(
        "Start prom2pushgateway version={} revision={}",
        env!("CARGO_PKG_VERSION"),
        REVISION
    );

    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    let app = Application::build(config)?;

    if cli.once {
        let outcome = app.run_once().await;
        return Ok(if outcome.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let shutdown = ShutdownService::new();
    if let Err(e) = shutdown.install() {
        error!("Unable to install signal handlers: {}", e);
        return Err(e.into());
    }

    app.run(shutdown.token()).await;
    Ok(ExitCode::SUCCESS)
}
