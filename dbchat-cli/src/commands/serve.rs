//! HTTP server command
//!
//! Runs the chat UI and API.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use dbchat_server::agent::gemini_sql_agent;
use dbchat_server::{run_server, AppState, Database, LlmConfig, ServerConfig};

use super::args::{DatabaseArgs, LlmArgs};

/// Arguments for the serve command
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "DBCHAT_BIND", default_value = "0.0.0.0:8501")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,

    #[command(flatten)]
    pub llm: LlmArgs,
}

impl ServeArgs {
    pub(crate) fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    // Configuration errors before any connection attempt
    let llm = args.llm.config()?;
    let config = args.db.config()?;

    let db = Database::connect(&config)
        .await
        .context("Failed to create database pool")?;
    serve(db, &llm, args.server_config()).await
}

pub(crate) async fn serve(db: Database, llm: &LlmConfig, config: ServerConfig) -> Result<()> {
    tracing::info!("Starting dbchat server on {}", config.bind_addr);

    let agent = gemini_sql_agent(&db, llm).context("Failed to build LLM client")?;
    let state = AppState::new(db, agent);

    // Run server (blocks until shutdown)
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
