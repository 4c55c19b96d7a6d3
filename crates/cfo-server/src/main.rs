use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use cfo_server::app;
use cfo_server::config::{ServerConfig, DEFAULT_CONFIG_PATH};
use cfo_server::state::{build_alert_engine, AppState};

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cfo-server [config.toml]    Start the server (default: {DEFAULT_CONFIG_PATH})");
    eprintln!("  cfo-server --help           Show this message");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cfo=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        path => run_server(path).await,
    }
}

async fn run_server(config_path: Option<&str>) -> Result<()> {
    let config = ServerConfig::load_or_default(config_path)?;

    tracing::info!(
        http_port = config.http_port,
        bind = %config.bind_address,
        default_rules = config.alert.load_default_rules,
        "cfo-server starting"
    );

    let engine = build_alert_engine(&config)?;
    tracing::info!(
        rules = engine.rules().len(),
        enabled = engine.rules().enabled_count(),
        channels = ?engine.notifier().registered(),
        "Alert engine ready"
    );

    let http_addr: SocketAddr = format!("{}:{}", config.bind_address, config.http_port).parse()?;
    let state = AppState::new(engine, config);
    let app = app::build_http_app(state);

    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    tracing::info!(http = %http_addr, "Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
