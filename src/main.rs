//! VoiceCake Relay
//!
//! A stateless HTTP reverse-proxy relay built with Tokio and Axum. Forwards
//! dashboard REST calls to the upstream Sim AI backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                VOICECAKE RELAY                │
//!                      │                                               │
//!   Caller Request     │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ───────────────────┼─▶│  http   │──▶│  relay   │──▶│ upstream  │──┼──▶ Sim AI
//!                      │  │ server  │   │ pipeline │   │  client   │  │   backend
//!                      │  └─────────┘   └──────────┘   └───────────┘  │
//!                      │                                               │
//!   Caller Response    │  ┌─────────────────────────────────────────┐ │
//!   ◀──────────────────┼──│ response reconstruction (status, headers│◀┼─── response
//!                      │  │ minus transport framing, decoded body)  │ │
//!                      │  └─────────────────────────────────────────┘ │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐ │
//!                      │  │         Cross-Cutting Concerns          │ │
//!                      │  │  config · observability · lifecycle     │ │
//!                      │  └─────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use voicecake_relay::config::loader::load_config;
use voicecake_relay::lifecycle::signals;
use voicecake_relay::observability::{logging, metrics};
use voicecake_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "voicecake-relay")]
#[command(about = "Relays VoiceCake dashboard calls to the Sim AI backend", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    logging::init_tracing(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        api_prefix = %config.upstream.api_prefix,
        request_timeout_secs = config.timeouts.request_secs,
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
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
