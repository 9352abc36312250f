//! Shop schema: users, products, orders, order_items
//!
//! Declarative only. The DDL below is what `Database::create_tables` runs,
//! the row structs are what the repositories decode into, and `TABLES` is
//! the catalog handed to the SQL agent and `GET /api/schema`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// CREATE TABLE statements in foreign-key dependency order.
pub const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id SERIAL PRIMARY KEY,
        name TEXT,
        email TEXT UNIQUE,
        hobby TEXT,
        job TEXT,
        age INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        product_id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
        stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        order_id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(user_id),
        order_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        status TEXT NOT NULL DEFAULT 'pending',
        total_amount DOUBLE PRECISION NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        order_item_id SERIAL PRIMARY KEY,
        order_id INTEGER NOT NULL REFERENCES orders(order_id) ON DELETE CASCADE,
        product_id INTEGER NOT NULL REFERENCES products(product_id),
        quantity INTEGER NOT NULL DEFAULT 1 CHECK (quantity > 0),
        unit_price DOUBLE PRECISION NOT NULL
    )
    "#,
];

pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_users_name ON users(name)",
    "CREATE INDEX IF NOT EXISTS idx_products_name ON products(name)",
    "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category)",
    "CREATE INDEX IF NOT EXISTS idx_orders_user ON orders(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_id)",
    "CREATE INDEX IF NOT EXISTS idx_order_items_product ON order_items(product_id)",
];

/// User record
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub user_id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub hobby: Option<String>,
    pub job: Option<String>,
    pub age: Option<i32>,
}

/// Product record
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Product {
    pub product_id: i32,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
}

/// Order record. `user_id` references `users.user_id`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Order {
    pub order_id: i32,
    pub user_id: i32,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub total_amount: f64,
}

/// Order line. References both `orders` and `products`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct OrderItem {
    pub order_item_id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: f64,
}

/// Order lifecycle states used by the sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(other.to_string()),
        }
    }
}

/// Column description for the table catalog
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub sql_type: &'static str,
    /// `table.column` this column references, if it is a foreign key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<&'static str>,
}

/// Table description for the table catalog
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TableInfo {
    pub name: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [ColumnInfo],
}

const fn col(name: &'static str, sql_type: &'static str) -> ColumnInfo {
    ColumnInfo {
        name,
        sql_type,
        references: None,
    }
}

const fn fk(name: &'static str, sql_type: &'static str, references: &'static str) -> ColumnInfo {
    ColumnInfo {
        name,
        sql_type,
        references: Some(references),
    }
}

pub const TABLES: &[TableInfo] = &[
    TableInfo {
        name: "users",
        primary_key: "user_id",
        columns: &[
            col("user_id", "integer"),
            col("name", "text"),
            col("email", "text"),
            col("hobby", "text"),
            col("job", "text"),
            col("age", "integer"),
        ],
    },
    TableInfo {
        name: "products",
        primary_key: "product_id",
        columns: &[
            col("product_id", "integer"),
            col("name", "text"),
            col("category", "text"),
            col("price", "double precision"),
            col("stock", "integer"),
        ],
    },
    TableInfo {
        name: "orders",
        primary_key: "order_id",
        columns: &[
            col("order_id", "integer"),
            fk("user_id", "integer", "users.user_id"),
            col("order_date", "timestamptz"),
            col("status", "text"),
            col("total_amount", "double precision"),
        ],
    },
    TableInfo {
        name: "order_items",
        primary_key: "order_item_id",
        columns: &[
            col("order_item_id", "integer"),
            fk("order_id", "integer", "orders.order_id"),
            fk("product_id", "integer", "products.product_id"),
            col("quantity", "integer"),
            col("unit_price", "double precision"),
        ],
    },
];

/// Render the catalog as prompt text: one line per table, then the
/// foreign keys.
pub fn describe_tables(tables: &[TableInfo]) -> String {
    let mut out = String::new();
    for table in tables {
        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.sql_type))
            .collect();
        out.push_str(&format!("{}({})\n", table.name, columns.join(", ")));
    }
    for table in tables {
        for column in table.columns.iter() {
            if let Some(target) = column.references {
                out.push_str(&format!("{}.{} -> {}\n", table.name, column.name, target));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_is_in_dependency_order() {
        let position = |name: &str| {
            CREATE_TABLES
                .iter()
                .position(|ddl| ddl.contains(&format!("EXISTS {} (", name)))
                .unwrap()
        };
        assert!(position("users") < position("orders"));
        assert!(position("orders") < position("order_items"));
        assert!(position("products") < position("order_items"));
    }

    #[test]
    fn catalog_matches_ddl() {
        for table in TABLES {
            let ddl = CREATE_TABLES
                .iter()
                .find(|ddl| ddl.contains(&format!("EXISTS {} (", table.name)))
                .unwrap();
            for column in table.columns {
                assert!(ddl.contains(column.name), "{}.{}", table.name, column.name);
            }
        }
    }

    #[test]
    fn describe_lists_relationships() {
        let text = describe_tables(TABLES);
        assert!(text.contains("orders.user_id -> users.user_id"));
        assert!(text.contains("order_items.order_id -> orders.order_id"));
        assert!(text.contains("order_items.product_id -> products.product_id"));
        assert!(text.starts_with("users(user_id integer"));
    }

    #[test]
    fn order_status_round_trips() {
        for status in [OrderStatus::Pending, OrderStatus::Shipped, OrderStatus::Cancelled] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("lost".parse::<OrderStatus>().is_err());
    }
}
