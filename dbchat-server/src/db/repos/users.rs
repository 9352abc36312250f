//! User queries and the user → orders relationship

use sqlx::PgPool;

use super::DbError;
use crate::schema::{Order, User};

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT user_id, name, email, hobby, job, age FROM users ORDER BY user_id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(users)
    }

    pub async fn get(&self, user_id: i32) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, name, email, hobby, job, age FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "user",
            id: user_id.to_string(),
        })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, name, email, hobby, job, age FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// A user's orders, oldest first.
    pub async fn orders(&self, user_id: i32) -> Result<Vec<Order>, DbError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT order_id, user_id, order_date, status, total_amount
            FROM orders
            WHERE user_id = $1
            ORDER BY order_date, order_id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(orders)
    }
}
