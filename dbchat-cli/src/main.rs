//! dbchat CLI - natural-language chat over a shop database
//!
//! Subcommands cover the container lifecycle:
//! - `wait-db`: block until PostgreSQL accepts connections
//! - `init-db`: create tables and load the sample data (idempotent)
//! - `serve`: run the chat UI and API
//! - `start`: all three in order
//! - `ask`: one question from the terminal

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::ask::AskArgs;
use commands::init_db::InitDbArgs;
use commands::serve::ServeArgs;
use commands::start::StartArgs;
use commands::wait_db::WaitDbArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "dbchat",
    author,
    version,
    about = "Ask questions about users, products and orders in plain English",
    long_about = "Chat with a PostgreSQL shop database. Questions are turned into read-only \
                  queries by a Gemini model and the results come back as short answers."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Wait until the database accepts connections
    WaitDb(WaitDbArgs),
    /// Create tables and seed sample data
    InitDb(InitDbArgs),
    /// Run the chat web server
    Serve(ServeArgs),
    /// Answer a single question and exit
    Ask(AskArgs),
    /// Wait for the database, initialize it, then serve
    Start(StartArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real deployments pass the environment directly
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::WaitDb(args) => commands::run_wait_db(args).await?,
        Commands::InitDb(args) => commands::run_init_db(args).await?,
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Ask(args) => commands::run_ask(args).await?,
        Commands::Start(args) => commands::run_start(args).await?,
    }
    Ok(())
}
