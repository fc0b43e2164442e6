//! Perp quoting bot - entry point.
//!
//! Loads and validates configuration, builds the simulated venue, and runs
//! the quoting loop until a shutdown signal arrives.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use quoter_bot::{AppConfig, DryRunGateway, SimVenue};
use quoter_engine::{DynOrderGateway, Quoter};
use tracing::info;

/// Perpetual-futures quoting bot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via QUOTER_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Log batches instead of applying them to the venue
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref())?;

    quoter_telemetry::init_logging(&config.logging.level)?;

    info!("Starting perp-quoter v{}", env!("CARGO_PKG_VERSION"));
    info!(
        instruments = config.engine.instruments.len(),
        cycle_delay_ms = config.engine.cycle_delay_ms,
        dry_run = args.dry_run,
        "Configuration loaded"
    );

    let venue = Arc::new(SimVenue::new(&config.sim));
    let gateway: DynOrderGateway = if args.dry_run {
        Arc::new(DryRunGateway::new())
    } else {
        venue.clone()
    };

    let quoter = Quoter::new(config.engine.clone(), venue.clone(), venue.clone(), gateway)?;

    tokio::select! {
        _ = quoter.run_forever_configured() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
