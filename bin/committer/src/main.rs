//! Committer binary
//!
//! Reads a cumulative payment list, builds the Merkle commitment for a payment
//! cycle and writes the root to publish together with every recipient's proof.

mod config;
mod report;

use std::fs;

use anyhow::{Context, Result};
use paypool_core::{CumulativePaymentCommitment, RawPayment};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{config::CommitterConfig, report::CommitmentReport};

fn main() -> Result<()> {
    // Setup logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = CommitterConfig::from_env()?;

    info!("Configuration:");
    info!("  Payment list: {}", config.payment_list.display());
    info!("  Cycle:        {}", config.cycle);
    if let Some(path) = &config.report_path {
        info!("  Report:       {}", path.display());
    }

    let raw = fs::read_to_string(&config.payment_list)
        .with_context(|| format!("failed to read {}", config.payment_list.display()))?;
    let payments: Vec<RawPayment> =
        serde_json::from_str(&raw).context("payment list is not a JSON array of payments")?;
    info!("Loaded {} payment entries", payments.len());

    let commitment = CumulativePaymentCommitment::new(payments)?;
    info!("Committed {} recipients", commitment.len());
    info!("Root: {}", commitment.hex_root());

    let report = CommitmentReport::new(&commitment, config.cycle);
    let json = if config.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &config.report_path {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
