//! Runtime configuration read from the environment
//!
//! Values are read once at process start. A missing required value is a
//! `ConfigError` and nothing tries to connect anywhere.

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default maximum connections for the pool.
/// Kept low: one chat request holds at most one connection.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Read `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_value(std::env::var(DATABASE_URL_ENV).ok())
    }

    /// Build from an optional value (e.g. a clap `env` argument).
    /// Empty strings count as unset; a value that is not a PostgreSQL
    /// connection string is rejected here rather than at connect time.
    pub fn from_value(url: Option<String>) -> Result<Self, ConfigError> {
        let url = require(url, DATABASE_URL_ENV)?;
        url.parse::<PgConnectOptions>()
            .map_err(|err| ConfigError::Invalid {
                name: DATABASE_URL_ENV,
                reason: err.to_string(),
            })?;
        Ok(Self::new(url))
    }
}

/// Gemini client settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Read `GOOGLE_API_KEY` and optionally `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(MODEL_ENV).ok(),
        )
    }

    pub fn from_values(api_key: Option<String>, model: Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::new(require(api_key, API_KEY_ENV)?);
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        Ok(config)
    }
}

fn require(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}
