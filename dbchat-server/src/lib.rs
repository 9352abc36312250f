//! dbchat-server: natural-language chat over a small shop database
//!
//! Startup order is probe → create tables → seed → serve. The chat
//! handler forwards questions to an LLM-backed SQL agent which runs its
//! generated query read-only against the shared pool.

pub mod agent;
pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod probe;
pub mod schema;
pub mod seed;

pub use agent::{AgentError, SqlAgent};
pub use config::{ConfigError, DatabaseConfig, LlmConfig};
pub use db::Database;
pub use http::{run_server, AppState, ServerConfig};
pub use probe::{wait_until_ready, PgReadiness, ProbeOptions};
pub use seed::{seed_database, SeedReport};
