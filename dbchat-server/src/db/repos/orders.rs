//! Order queries: order → user, order → items, sales rollups

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::DbError;
use crate::schema::{Order, OrderItem, User};

/// Order line joined with its product
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct OrderLine {
    pub order_item_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Total spend per user (users without orders report zero)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct UserSales {
    pub user_id: i32,
    pub name: Option<String>,
    pub order_count: i64,
    pub total_spent: f64,
}

/// Order repository
pub struct OrderRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_items(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    pub async fn list(&self) -> Result<Vec<Order>, DbError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT order_id, user_id, order_date, status, total_amount FROM orders ORDER BY order_id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn get(&self, order_id: i32) -> Result<Order, DbError> {
        sqlx::query_as::<_, Order>(
            "SELECT order_id, user_id, order_date, status, total_amount FROM orders WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| not_found(order_id))
    }

    /// The user who placed the order.
    pub async fn user(&self, order_id: i32) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.user_id, u.name, u.email, u.hobby, u.job, u.age
            FROM orders o
            JOIN users u ON u.user_id = o.user_id
            WHERE o.order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| not_found(order_id))
    }

    pub async fn items(&self, order_id: i32) -> Result<Vec<OrderItem>, DbError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT order_item_id, order_id, product_id, quantity, unit_price
            FROM order_items
            WHERE order_id = $1
            ORDER BY order_item_id
            "#,
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// Items of an order with product names, in a single JOIN.
    pub async fn lines(&self, order_id: i32) -> Result<Vec<OrderLine>, DbError> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT
                i.order_item_id,
                i.product_id,
                p.name AS product_name,
                i.quantity,
                i.unit_price,
                i.quantity * i.unit_price AS line_total
            FROM order_items i
            JOIN products p ON p.product_id = i.product_id
            WHERE i.order_id = $1
            ORDER BY i.order_item_id
            "#,
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;
        Ok(lines)
    }

    /// Total sales amount by user, biggest spender first.
    pub async fn sales_by_user(&self) -> Result<Vec<UserSales>, DbError> {
        let rows = sqlx::query_as::<_, UserSales>(
            r#"
            SELECT
                u.user_id,
                u.name,
                COUNT(o.order_id) AS order_count,
                COALESCE(SUM(o.total_amount), 0)::DOUBLE PRECISION AS total_spent
            FROM users u
            LEFT JOIN orders o ON o.user_id = u.user_id
            GROUP BY u.user_id, u.name
            ORDER BY total_spent DESC, u.user_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}

fn not_found(order_id: i32) -> DbError {
    DbError::NotFound {
        resource: "order",
        id: order_id.to_string(),
    }
}
