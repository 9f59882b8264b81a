//! Identity-augmenting HTTP proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────────┐
//!                      │                 IDENTITY PROXY                 │
//!                      │                                                │
//!   Client Request     │  ┌─────────┐    ┌──────────────┐               │
//!   ───────────────────┼─▶│  http   │───▶│   pipeline   │               │
//!                      │  │ server  │    │   handler    │               │
//!                      │  └─────────┘    └──────┬───────┘               │
//!                      │                        │ Authorization?        │
//!                      │                        ▼                       │
//!                      │                 ┌──────────────┐   ┌────────┐  │
//!                      │                 │  augmenter   │──▶│identity│──┼──▶ Identity
//!                      │                 │ (User-Uuid)  │   │resolver│  │    Service
//!                      │                 └──────┬───────┘   └────────┘  │
//!                      │                        ▼                       │
//!   Client Response    │  ┌─────────┐    ┌──────────────┐               │
//!   ◀──────────────────┼──│  relay  │◀───│  forwarder   │◀──────────────┼──── Upstream
//!                      │  │-UserUuid│    │              │               │
//!                      │  └─────────┘    └──────────────┘               │
//!                      └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use identity_proxy::config::{load_config_with, ConfigOverrides, DEFAULT_CONFIG_PATH};
use identity_proxy::observability::{logging, metrics};
use identity_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "identity-proxy")]
#[command(about = "Injects a resolved User-Uuid claim into proxied requests", long_about = None)]
struct Cli {
    /// Configuration file (JSON, or TOML when the name ends in .toml).
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        bind_address: cli.bind,
    };
    let config = load_config_with(&cli.config, &overrides)?;

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "identity-proxy starting"
    );
    tracing::info!(
        identity_endpoint = %config.path,
        upstream = ?config.upstream.address,
        on_failure = ?config.identity.on_failure,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;
    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
