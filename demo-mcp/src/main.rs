use std::process;
use std::sync::Arc;
use anyhow::Result;
use demo_mcp::server::McpServer;
use log::{error, info};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match demo_mcp::config::load_config() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    // Initialize logging; stdout carries protocol frames, so log to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&settings.log_level))
        .target(env_logger::Target::Stderr)
        .init();

    info!("Starting {} version {}", settings.server.name, settings.server.version);

    let server = match McpServer::from_settings(&settings) {
        Ok(server) => Arc::new(server),
        Err(e) => {
            error!("Failed to initialize server: {:#}", e);
            process::exit(1);
        }
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt");
            on_signal.cancel();
        }
    });

    match server.serve(tokio::io::stdin(), tokio::io::stdout(), cancel).await {
        Ok(()) => {
            info!("{} stopped gracefully", settings.server.name);
            // The stdin reader thread may still be parked in a blocking read
            process::exit(0);
        }
        Err(e) => {
            error!("Server terminated: {}", e);
            process::exit(1);
        }
    }
}
