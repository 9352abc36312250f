//! Container entrypoint in one process: wait-db → init-db → serve

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use dbchat_server::ProbeOptions;

use super::init_db::connect_and_init;
use super::serve::{serve, ServeArgs};
use super::wait_db::wait_for;

/// Arguments for the start command
#[derive(Parser, Debug, Clone)]
pub struct StartArgs {
    #[command(flatten)]
    pub serve: ServeArgs,

    /// Seconds between readiness probe attempts
    #[arg(long, default_value = "2")]
    pub interval_secs: u64,
}

pub async fn run_start(args: StartArgs) -> Result<()> {
    let llm = args.serve.llm.config()?;
    let config = args.serve.db.config()?;

    let options = ProbeOptions {
        interval: Duration::from_secs(args.interval_secs),
        max_attempts: None,
    };
    wait_for(&config, &options).await?;

    let db = connect_and_init(&config).await?;
    serve(db, &llm, args.serve.server_config()).await
}
