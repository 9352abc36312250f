//! Startup readiness probe
//!
//! Blocks until the database answers `SELECT 1`. Used once, before table
//! creation; steady-state requests never go through here.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Connection, PgConnection};

use crate::config::DatabaseConfig;
use crate::db::Database;

/// Something that can be asked "are you up?"
#[async_trait]
pub trait Readiness: Send + Sync {
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// Opens a fresh connection per attempt. No pool, so a half-started server
/// never leaves broken connections cached.
#[derive(Debug, Clone)]
pub struct PgReadiness {
    url: String,
}

impl PgReadiness {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
        }
    }
}

#[async_trait]
impl Readiness for PgReadiness {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = PgConnection::connect(&self.url).await?;
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&mut conn)
            .await?;
        conn.close().await
    }
}

#[async_trait]
impl Readiness for Database {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        Database::ping(self).await
    }
}

#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Sleep between attempts
    pub interval: Duration,
    /// `None` polls forever (the startup behaviour)
    pub max_attempts: Option<u32>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("database not ready after {attempts} attempts: {last_error}")]
    GaveUp { attempts: u32, last_error: String },

    /// Retrying cannot fix a bad connection string.
    #[error("database connection is misconfigured: {0}")]
    Misconfigured(String),
}

/// Poll `target` until it answers. Returns the number of attempts made.
///
/// Connection failures are retried; configuration errors end the loop
/// on the first attempt.
pub async fn wait_until_ready<R>(target: &R, options: &ProbeOptions) -> Result<u32, ProbeError>
where
    R: Readiness + ?Sized,
{
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match target.ping().await {
            Ok(()) => {
                tracing::info!(attempts, "Database is ready");
                return Ok(attempts);
            }
            Err(sqlx::Error::Configuration(err)) => {
                return Err(ProbeError::Misconfigured(err.to_string()));
            }
            Err(err) => {
                if options.max_attempts.is_some_and(|max| attempts >= max) {
                    return Err(ProbeError::GaveUp {
                        attempts,
                        last_error: err.to_string(),
                    });
                }
                tracing::info!(
                    attempts,
                    error = %err,
                    retry_in_ms = options.interval.as_millis() as u64,
                    "Database not ready yet"
                );
                tokio::time::sleep(options.interval).await;
            }
        }
    }
}
