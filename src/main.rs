//! segment-router server
//!
//! Serves a configured route table over HTTP. Without a config file it
//! answers `GET /` and `GET /:url` with `Hello, World!` on port 3000.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                SEGMENT ROUTER                │
//!                      │                                              │
//!   Client Request     │  ┌─────────┐   ┌───────────┐   ┌──────────┐  │
//!   ───────────────────┼─▶│  http   │──▶│  routing  │──▶│ handler  │  │
//!                      │  │ server  │   │ dispatch  │   │  (text)  │  │
//!   Client Response    │  └─────────┘   └─────▲─────┘   └────┬─────┘  │
//!   ◀──────────────────┼───────────────────────┼──────────────┘        │
//!                      │                       │ snapshot swap         │
//!                      │  ┌─────────┐   ┌──────┴─────┐   ┌──────────┐ │
//!                      │  │ config  │──▶│ lifecycle  │   │  admin   │ │
//!                      │  │ watcher │   │  startup   │   │   API    │ │
//!                      │  └─────────┘   └────────────┘   └──────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use segment_router::config::{load_config, ConfigWatcher, RouterConfig};
use segment_router::lifecycle::Shutdown;
use segment_router::observability::{logging, metrics};
use segment_router::HttpServer;

#[derive(Parser)]
#[command(name = "segment-router")]
#[command(about = "HTTP router with segment patterns and named parameters", long_about = None)]
struct Args {
    /// Path to a TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload routes when the config file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Fail fast: a bad config file stops startup.
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("segment-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::from_config(config)?;

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (Some(watcher.run()?), rx)
        }
        _ => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
