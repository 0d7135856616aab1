//! Origin status service.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /v1/all-status
//!     ─────────────────▶ http::server ──▶ http::dispatch ──▶ checks::registry
//!                                                │
//!                                                ▼
//!                                      probe::coordinator
//!                                     ┌──────────┴──────────┐
//!                                     ▼                     ▼
//!                              probe::executor       probe::executor ──▶ origin B
//!                                     │                     │
//!                         origin A ◀──┘                     │
//!                                     └──────────┬──────────┘
//!     ◀───────────────── JSON body ◀─────────────┘  (declared origin order)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use origin_status::http::HttpServer;
use origin_status::lifecycle::{startup, Shutdown};
use origin_status::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "origin-status")]
#[command(about = "Reports reachability and latency of a fixed set of web origins", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overriding the configured bind address's port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::resolve_config(cli.config.as_deref(), cli.port)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        probe_timeout_secs = config.probe.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.requested()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
