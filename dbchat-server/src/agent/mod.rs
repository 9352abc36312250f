//! NL-to-SQL agent
//!
//! The chat application only sees `SqlAgent`: a question goes in, a
//! plain-language answer comes out. Behind it sit two narrower seams, the
//! LLM (`LlmProvider`) and the read-only query runner (`QueryExecutor`), so
//! either can be swapped or stubbed.

pub mod executor;
pub mod gemini;
pub mod sql;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::db::Database;

pub use gemini::GeminiClient;
pub use sql::LlmSqlAgent;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM returned {status}: {body}")]
    LlmStatus { status: u16, body: String },

    #[error("LLM returned no text")]
    EmptyResponse,

    #[error("generated statement is not a single read query: {0}")]
    InvalidSql(String),

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("malformed query result: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Question in, answer out.
#[async_trait]
pub trait SqlAgent: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String, AgentError>;
}

/// Single-turn text completion.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AgentError>;
    fn name(&self) -> &str;
}

/// Runs one generated statement without write access and returns its rows
/// as a JSON array of objects.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn run_read_only(&self, sql: &str) -> Result<serde_json::Value, AgentError>;
}

/// The production agent: Gemini for language, the shared pool for queries.
pub fn gemini_sql_agent(db: &Database, config: &LlmConfig) -> Result<Arc<dyn SqlAgent>, AgentError> {
    let llm = GeminiClient::new(config)?;
    tracing::info!(model = %config.model, "LLM client ready");
    Ok(Arc::new(LlmSqlAgent::new(
        Arc::new(llm),
        Arc::new(db.clone()),
    )))
}
