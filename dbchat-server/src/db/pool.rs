//! Connection pool ownership
//!
//! Uses sqlx PgPool with explicit connection limits.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use crate::config::DatabaseConfig;
use crate::schema::{CREATE_INDEXES, CREATE_TABLES};

/// Advisory lock key serializing schema creation across processes.
const DDL_LOCK_KEY: i64 = 0x6462_6368_6464;

/// The process-wide pool handle. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create the pool and open its first connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let db = Database::connect(&DatabaseConfig::from_env()?).await?;
    /// ```
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create all four tables and their indexes if they do not exist.
    ///
    /// An incompatible pre-existing table is not altered; the mismatch
    /// surfaces later as a database error.
    pub async fn create_tables(&self) -> Result<(), sqlx::Error> {
        tracing::info!("Creating tables...");
        let mut tx = self.pool.begin().await?;
        // Concurrent IF NOT EXISTS can still collide in the catalog.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(DDL_LOCK_KEY)
            .execute(&mut *tx)
            .await?;
        for ddl in CREATE_TABLES.iter().chain(CREATE_INDEXES) {
            sqlx::query(ddl).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        tracing::info!(tables = CREATE_TABLES.len(), "Tables ready");
        Ok(())
    }

    /// Start a unit of work. Dropping it without `commit()` rolls back.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Trivial round-trip.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p dbchat-server -- --ignored

    async fn connect() -> Database {
        let config = DatabaseConfig::from_env().expect("DATABASE_URL required");
        Database::connect(&config).await.expect("pool creation failed")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn ping_round_trips() {
        let db = connect().await;
        db.ping().await.expect("ping failed");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_tables_is_repeatable() {
        let db = connect().await;
        db.create_tables().await.expect("first create failed");
        db.create_tables().await.expect("second create failed");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = 'public' \
             AND table_name IN ('users', 'products', 'orders', 'order_items') \
             ORDER BY table_name",
        )
        .fetch_all(db.pool())
        .await
        .expect("query failed");
        assert_eq!(tables, ["order_items", "orders", "products", "users"]);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn dropped_unit_of_work_rolls_back() {
        let db = connect().await;
        db.create_tables().await.unwrap();

        let email = "rollback.probe@example.com";
        {
            let mut tx = db.begin().await.unwrap();
            sqlx::query("INSERT INTO users (name, email) VALUES ('probe', $1)")
                .bind(email)
                .execute(&mut *tx)
                .await
                .unwrap();
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
