//! # Phi-Chain Node
//!
//! Hosts one [`ChainService`] and produces a block every slot while the
//! pending pool is non-empty.
//!
//! ## Startup Sequence
//!
//! 1. Install the tracing subscriber (`RUST_LOG` overrides the `info` default)
//! 2. Load and validate configuration (`PC_*` environment overrides)
//! 3. Build the service; genesis is created deterministically
//! 4. Register the configured validators
//! 5. Tick every slot until Ctrl+C
//!
//! Mining is CPU-bound, so each attempt runs on the blocking pool.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::{load_config, ChainService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config();
    config.validate().context("invalid node configuration")?;

    let service = Arc::new(ChainService::new(&config));
    for validator in &config.validators {
        if let Err(e) = service.register_validator(&validator.id, validator.stake) {
            warn!(validator = %validator.id, error = %e, "Skipping configured validator");
        }
    }

    let params = pc_01_fibonacci::ProtocolParams::get();
    let slot = config.mining.slot_interval(params);
    let difficulty = config.mining.difficulty;
    let genesis = service.get_chain_summary();

    info!("===========================================");
    info!("  Phi-Chain Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(
        genesis = %genesis.latest_hash,
        slot_secs = slot.as_secs(),
        difficulty,
        validators = service.network_stats().active_validators,
        "Node is running. Press Ctrl+C to stop."
    );

    let mut ticker = tokio::time::interval(slot);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if service.pending_count() == 0 {
                    debug!("Slot idle: pending pool empty");
                    continue;
                }
                let worker = Arc::clone(&service);
                let task = tokio::task::spawn_blocking(move || worker.produce_block(difficulty));
                match task.await {
                    Ok(Ok(block)) => info!(
                        index = block.index,
                        hash = %block.hash,
                        txs = block.tx_count,
                        "Slot filled"
                    ),
                    Ok(Err(e)) if e.is_retryable() => {
                        warn!(error = %e, "Block production deferred")
                    }
                    Ok(Err(e)) => error!(error = %e, "Block production failed"),
                    Err(e) => error!(error = %e, "Mining task panicked"),
                }
            }
            result = &mut shutdown => {
                result.context("failed to listen for shutdown signal")?;
                info!("Shutdown signal received");
                break;
            }
        }
    }

    let summary = service.get_chain_summary();
    info!(
        length = summary.length,
        valid = summary.is_valid,
        pending = summary.pending_count,
        "Node stopped"
    );
    Ok(())
}
