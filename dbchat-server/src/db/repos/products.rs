//! Product queries and the product → order_items relationship

use sqlx::PgPool;

use super::DbError;
use crate::schema::{OrderItem, Product};

/// Product repository
pub struct ProductRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    pub async fn list(&self) -> Result<Vec<Product>, DbError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT product_id, name, category, price, stock FROM products ORDER BY product_id",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    pub async fn get(&self, product_id: i32) -> Result<Product, DbError> {
        sqlx::query_as::<_, Product>(
            "SELECT product_id, name, category, price, stock FROM products WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "product",
            id: product_id.to_string(),
        })
    }

    /// Most expensive products first. Ties break on product_id.
    pub async fn top_by_price(&self, limit: i64) -> Result<Vec<Product>, DbError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, name, category, price, stock
            FROM products
            ORDER BY price DESC, product_id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// Products with `stock <= threshold`, emptiest first.
    pub async fn low_stock(&self, threshold: i32) -> Result<Vec<Product>, DbError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, name, category, price, stock
            FROM products
            WHERE stock <= $1
            ORDER BY stock, product_id
            "#,
        )
        .bind(threshold)
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// Every order line that sold this product.
    pub async fn order_items(&self, product_id: i32) -> Result<Vec<OrderItem>, DbError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT order_item_id, order_id, product_id, quantity, unit_price
            FROM order_items
            WHERE product_id = $1
            ORDER BY order_item_id
            "#,
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }
}
