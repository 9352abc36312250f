//! One-shot question from the command line
//!
//! Same agent as the web UI, without the browser.

use anyhow::{Context, Result};
use clap::Parser;

use dbchat_server::agent::gemini_sql_agent;
use dbchat_server::http::routes::chat::sanitize_answer;
use dbchat_server::models::Question;
use dbchat_server::Database;

use super::args::{DatabaseArgs, LlmArgs};

/// Arguments for the ask command
#[derive(Parser, Debug, Clone)]
pub struct AskArgs {
    /// Question in plain English, e.g. "How many users are in the system?"
    pub question: String,

    #[command(flatten)]
    pub db: DatabaseArgs,

    #[command(flatten)]
    pub llm: LlmArgs,
}

pub async fn run_ask(args: AskArgs) -> Result<()> {
    let question = Question::new(&args.question)?;
    let llm = args.llm.config()?;
    let config = args.db.config()?;

    let db = Database::connect(&config)
        .await
        .context("Failed to create database pool")?;
    let agent = gemini_sql_agent(&db, &llm).context("Failed to build LLM client")?;

    let answer = agent
        .answer(question.as_str())
        .await
        .context("Could not answer the question")?;
    println!("{}", sanitize_answer(&answer));

    db.close().await;
    Ok(())
}
