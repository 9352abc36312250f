//! Readiness probe command
//!
//! Blocks container start-up until PostgreSQL accepts connections.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use dbchat_server::{wait_until_ready, DatabaseConfig, PgReadiness, ProbeOptions};

use super::args::DatabaseArgs;

/// Arguments for the wait-db command
#[derive(Parser, Debug, Clone)]
pub struct WaitDbArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Seconds to sleep between attempts
    #[arg(long, default_value = "2")]
    pub interval_secs: u64,

    /// Give up after this many attempts (default: never)
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

impl WaitDbArgs {
    fn options(&self) -> ProbeOptions {
        ProbeOptions {
            interval: Duration::from_secs(self.interval_secs),
            max_attempts: self.max_attempts,
        }
    }
}

pub async fn run_wait_db(args: WaitDbArgs) -> Result<()> {
    let config = args.db.config()?;
    wait_for(&config, &args.options()).await
}

pub(crate) async fn wait_for(config: &DatabaseConfig, options: &ProbeOptions) -> Result<()> {
    tracing::info!("Waiting for database...");
    let probe = PgReadiness::new(config);
    wait_until_ready(&probe, options)
        .await
        .context("Database never became ready")?;
    Ok(())
}
