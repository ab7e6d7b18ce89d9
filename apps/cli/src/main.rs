//! BrandGate CLI — brand and company submission request tracking.
//!
//! Validates submissions, records them in the request ledger and ingestion
//! queue, and notifies the requestor once a batch is queued.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
