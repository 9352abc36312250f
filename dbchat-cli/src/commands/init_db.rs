//! Schema creation and sample-data seeding

use anyhow::{Context, Result};
use clap::Parser;

use dbchat_server::seed::TableOutcome;
use dbchat_server::{seed_database, Database, DatabaseConfig};

use super::args::DatabaseArgs;

/// Arguments for the init-db command
#[derive(Parser, Debug, Clone)]
pub struct InitDbArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let config = args.db.config()?;
    let db = connect_and_init(&config).await?;
    db.close().await;
    Ok(())
}

/// Create tables then seed whichever are empty.
pub(crate) async fn init(db: &Database) -> Result<()> {
    db.create_tables().await.context("Failed to create tables")?;
    let report = seed_database(db).await.context("Failed to seed sample data")?;

    for (table, outcome) in &report.tables {
        match outcome {
            TableOutcome::Inserted { rows } => println!("{:<12} seeded {} rows", table, rows),
            TableOutcome::Skipped { existing } => {
                println!("{:<12} skipped ({} rows already present)", table, existing)
            }
        }
    }
    Ok(())
}

/// Connect and run `init` in one step.
pub(crate) async fn connect_and_init(config: &DatabaseConfig) -> Result<Database> {
    let db = Database::connect(config)
        .await
        .context("Failed to create database pool")?;
    init(&db).await?;
    Ok(db)
}
