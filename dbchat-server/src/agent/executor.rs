//! `QueryExecutor` backed by the process pool

use async_trait::async_trait;

use super::{AgentError, QueryExecutor};
use crate::db::Database;

/// Upper bound on a single generated query.
const STATEMENT_TIMEOUT: &str = "10s";

/// Wrap a statement so Postgres hands back the whole result set as one
/// JSON array of row objects. The statement sits on its own lines so a
/// trailing `--` comment cannot swallow the closing parenthesis.
pub fn wrap_as_json(sql: &str) -> String {
    format!(
        "SELECT COALESCE(json_agg(q), '[]'::json)::text FROM (\n{}\n) AS q",
        sql
    )
}

#[async_trait]
impl QueryExecutor for Database {
    async fn run_read_only(&self, sql: &str) -> Result<serde_json::Value, AgentError> {
        let mut tx = self.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("SET LOCAL statement_timeout = '{}'", STATEMENT_TIMEOUT))
            .execute(&mut *tx)
            .await?;

        let text: String = sqlx::query_scalar(&wrap_as_json(sql))
            .fetch_one(&mut *tx)
            .await?;
        tx.rollback().await?;

        Ok(serde_json::from_str(&text)?)
    }
}
