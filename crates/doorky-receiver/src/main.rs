//! # Doorky Receiver
//!
//! Receives signed door status updates over HTTP and stores them in the
//! door timeseries.
//!
//! ## Startup Sequence
//!
//! 1. Parse command line, install logging
//! 2. Load and validate configuration
//! 3. Open the timeseries database and build the secret registry
//! 4. Serve HTTP until Ctrl+C

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;

use doorky_receiver::telemetry::init_tracing;
use doorky_receiver::{ReceiverConfig, ReceiverService};

/// Doorky door status receiver
#[derive(Parser, Debug)]
#[command(name = "doorky-receiver")]
#[command(about = "Receives signed door status updates and exports space status")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// host:port to bind the HTTP server to (overrides http.bind)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Log filter, e.g. "info" or "doorky_receiver=debug"
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level, args.json_logs)
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    let mut config = ReceiverConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        config.http.bind = bind;
    }

    let service = ReceiverService::new(&config).context("starting receiver")?;

    info!(addr = %service.bind_addr(), "Receiver is running. Press Ctrl+C to stop.");
    service
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received shutdown signal");
        })
        .await
        .context("serving HTTP")?;

    Ok(())
}
