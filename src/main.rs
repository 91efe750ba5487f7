//! API gateway simulator.
//!
//! ```text
//!   traffic generator ──▶ POST /chat/completions
//!                              │
//!                              ▼
//!                     ┌─────────────────┐
//!                     │  rate limiter   │──▶ 429
//!                     └────────┬────────┘
//!                              ▼
//!                     ┌─────────────────┐     ┌────────────────┐
//!                     │ weighted select │◀────│ health tracker │
//!                     └────────┬────────┘     └───────▲────────┘
//!                              ▼                      │
//!                     ┌─────────────────┐   failure / success
//!                     │ simulated call  │─────────────┘
//!                     └────────┬────────┘
//!                              ▼
//!                     200 {provider, latency} / 502
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use gateway_sim::config::ConfigWatcher;
use gateway_sim::lifecycle::{signals, startup, Shutdown};
use gateway_sim::observability::{logging, metrics};
use gateway_sim::simulation::TrafficGenerator;
use gateway_sim::HttpServer;

#[derive(Parser)]
#[command(name = "gateway-sim")]
#[command(about = "API gateway simulator with rate limiting and weighted failover", long_about = None)]
struct Args {
    /// TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not start the synthetic traffic generator.
    #[arg(long)]
    no_traffic: bool,

    /// Override the number of traffic clients.
    #[arg(long)]
    clients: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = startup::load_or_default(args.config.as_deref())?;
    if let Some(clients) = args.clients {
        config.traffic.clients = clients;
    }
    if args.no_traffic {
        config.traffic.enabled = false;
    }

    logging::init(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gateway-sim starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path, &config);
            match watcher.run() {
                Ok(handle) => (Some(handle), updates),
                Err(e) => {
                    tracing::warn!(error = %e, "Config hot reload disabled");
                    (None, updates)
                }
            }
        }
        None => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let traffic = if config.traffic.enabled {
        let generator =
            TrafficGenerator::new(&startup::local_base_url(local_addr), config.traffic.clone())?;
        let shutdown = shutdown.clone();
        Some(tokio::spawn(async move { generator.run(&shutdown).await }))
    } else {
        None
    };

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    if let Some(traffic) = traffic {
        if let Ok(report) = traffic.await {
            tracing::info!(sent = report.sent, errors = report.errors, "Traffic summary");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
