//! Argument groups shared by several commands

use anyhow::Result;
use clap::Args;

use dbchat_server::{DatabaseConfig, LlmConfig};

/// Database connection
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

impl DatabaseArgs {
    pub fn config(&self) -> Result<DatabaseConfig> {
        Ok(DatabaseConfig::from_value(self.database_url.clone())?)
    }
}

/// LLM access
#[derive(Args, Debug, Clone)]
pub struct LlmArgs {
    /// Google AI Studio API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model name (default: gemini-2.5-flash)
    #[arg(long, env = "GEMINI_MODEL")]
    pub model: Option<String>,
}

impl LlmArgs {
    pub fn config(&self) -> Result<LlmConfig> {
        Ok(LlmConfig::from_values(self.api_key.clone(), self.model.clone())?)
    }
}
