//! Sample data seeding
//!
//! Each table is checked on its own: a table that already has rows is left
//! alone, an empty one gets the fixed sample rows. Later tables find their
//! parents by natural key (user email, product name, order owner + status),
//! so an orders-only reseed still links to the existing users.
//!
//! Partially seeded databases are not reconciled. If an empty table needs a
//! sample parent row that a non-empty table does not contain, seeding fails
//! with `SeedError::MissingReference` and the whole run rolls back.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgConnection;

use crate::db::Database;
use crate::schema::OrderStatus;

pub struct SeedUser {
    pub name: &'static str,
    pub email: &'static str,
    pub hobby: &'static str,
    pub job: &'static str,
    pub age: i32,
}

pub struct SeedProduct {
    pub name: &'static str,
    pub category: &'static str,
    pub price: f64,
    pub stock: i32,
}

pub struct SeedItem {
    pub product: &'static str,
    pub quantity: i32,
}

pub struct SeedOrder {
    pub user_email: &'static str,
    pub status: OrderStatus,
    pub items: &'static [SeedItem],
}

pub const USERS: &[SeedUser] = &[
    SeedUser {
        name: "john doe",
        email: "john.doe@example.com",
        hobby: "Photography",
        job: "Software Engineer",
        age: 29,
    },
    SeedUser {
        name: "jane smith",
        email: "jane.smith@example.com",
        hobby: "Painting",
        job: "Graphic Designer",
        age: 34,
    },
    SeedUser {
        name: "alice brown",
        email: "alice.brown@example.com",
        hobby: "Hiking",
        job: "Data Scientist",
        age: 27,
    },
    SeedUser {
        name: "bob johnson",
        email: "bob.johnson@example.com",
        hobby: "Cycling",
        job: "Marketing Manager",
        age: 41,
    },
    SeedUser {
        name: "carol lee",
        email: "carol.lee@example.com",
        hobby: "Cooking",
        job: "Teacher",
        age: 38,
    },
];

pub const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Wireless Mouse",
        category: "Electronics",
        price: 24.99,
        stock: 120,
    },
    SeedProduct {
        name: "Mechanical Keyboard",
        category: "Electronics",
        price: 79.99,
        stock: 85,
    },
    SeedProduct {
        name: "Noise Cancelling Headphones",
        category: "Electronics",
        price: 129.99,
        stock: 60,
    },
    SeedProduct {
        name: "Running Shoes",
        category: "Apparel",
        price: 59.99,
        stock: 150,
    },
    SeedProduct {
        name: "Water Bottle",
        category: "Outdoors",
        price: 14.99,
        stock: 200,
    },
];

pub const ORDERS: &[SeedOrder] = &[
    SeedOrder {
        user_email: "john.doe@example.com",
        status: OrderStatus::Completed,
        items: &[
            SeedItem {
                product: "Wireless Mouse",
                quantity: 2,
            },
            SeedItem {
                product: "Water Bottle",
                quantity: 1,
            },
        ],
    },
    SeedOrder {
        user_email: "jane.smith@example.com",
        status: OrderStatus::Shipped,
        items: &[
            SeedItem {
                product: "Mechanical Keyboard",
                quantity: 1,
            },
            SeedItem {
                product: "Running Shoes",
                quantity: 1,
            },
        ],
    },
    SeedOrder {
        user_email: "alice.brown@example.com",
        status: OrderStatus::Processing,
        items: &[SeedItem {
            product: "Noise Cancelling Headphones",
            quantity: 1,
        }],
    },
];

impl SeedOrder {
    /// Sum of `quantity * unit_price`, with unit prices from `price_of`.
    pub fn total(&self, price_of: impl Fn(&str) -> Option<f64>) -> Result<f64, SeedError> {
        self.items.iter().try_fold(0.0, |acc, item| {
            let price = price_of(item.product).ok_or_else(|| missing_product(item.product))?;
            Ok(acc + f64::from(item.quantity) * price)
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cannot seed {table}: {entity} '{key}' is missing (partially seeded database?)")]
    MissingReference {
        table: &'static str,
        entity: &'static str,
        key: String,
    },
}

/// What happened to one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TableOutcome {
    Inserted { rows: usize },
    Skipped { existing: i64 },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub tables: Vec<(&'static str, TableOutcome)>,
}

impl SeedReport {
    pub fn outcome(&self, table: &str) -> Option<&TableOutcome> {
        self.tables
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, outcome)| outcome)
    }

    pub fn inserted_rows(&self) -> usize {
        self.tables
            .iter()
            .map(|(_, outcome)| match outcome {
                TableOutcome::Inserted { rows } => *rows,
                TableOutcome::Skipped { .. } => 0,
            })
            .sum()
    }
}

/// Seed inside one unit of work and commit it.
pub async fn seed_database(db: &Database) -> Result<SeedReport, SeedError> {
    let mut tx = db.begin().await?;
    let report = seed(&mut tx).await?;
    tx.commit().await?;
    tracing::info!(inserted = report.inserted_rows(), "Seeding complete");
    Ok(report)
}

/// Advisory lock key serializing concurrent seeders (e.g. two replicas
/// starting together). Held until the transaction ends.
const SEED_LOCK_KEY: i64 = 0x6462_6368_6174;

/// Seeding order: parents before children.
const TABLE_ORDER: [&str; 4] = ["users", "products", "orders", "order_items"];

/// Insert the sample dataset into whichever tables are empty.
///
/// Does not commit; the caller owns the transaction.
pub async fn seed(conn: &mut PgConnection) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SEED_LOCK_KEY)
        .execute(&mut *conn)
        .await?;

    for table in TABLE_ORDER {
        let existing = row_count(&mut *conn, table).await?;
        if existing > 0 {
            tracing::info!(table, existing, "Table already populated, skipping");
            report.tables.push((table, TableOutcome::Skipped { existing }));
            continue;
        }

        let rows = match table {
            "users" => seed_users(&mut *conn).await?,
            "products" => seed_products(&mut *conn).await?,
            "orders" => seed_orders(&mut *conn).await?,
            _ => seed_order_items(&mut *conn).await?,
        };
        tracing::info!(table, rows, "Seeded table");
        report.tables.push((table, TableOutcome::Inserted { rows }));
    }

    Ok(report)
}

async fn row_count(conn: &mut PgConnection, table: &'static str) -> Result<i64, sqlx::Error> {
    // Table names come from TABLE_ORDER, never from input.
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(conn)
        .await
}

async fn seed_users(conn: &mut PgConnection) -> Result<usize, SeedError> {
    for user in USERS {
        sqlx::query("INSERT INTO users (name, email, hobby, job, age) VALUES ($1, $2, $3, $4, $5)")
            .bind(user.name)
            .bind(user.email)
            .bind(user.hobby)
            .bind(user.job)
            .bind(user.age)
            .execute(&mut *conn)
            .await?;
    }
    Ok(USERS.len())
}

async fn seed_products(conn: &mut PgConnection) -> Result<usize, SeedError> {
    for product in PRODUCTS {
        sqlx::query("INSERT INTO products (name, category, price, stock) VALUES ($1, $2, $3, $4)")
            .bind(product.name)
            .bind(product.category)
            .bind(product.price)
            .bind(product.stock)
            .execute(&mut *conn)
            .await?;
    }
    Ok(PRODUCTS.len())
}

async fn seed_orders(conn: &mut PgConnection) -> Result<usize, SeedError> {
    let products = product_lookup(conn).await?;
    for order in ORDERS {
        let user_id = user_id_by_email(conn, order.user_email).await?;
        let total = order.total(|name| products.get(name).map(|(_, price)| *price))?;
        sqlx::query("INSERT INTO orders (user_id, status, total_amount) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(order.status.as_str())
            .bind(total)
            .execute(&mut *conn)
            .await?;
    }
    Ok(ORDERS.len())
}

async fn seed_order_items(conn: &mut PgConnection) -> Result<usize, SeedError> {
    let products = product_lookup(conn).await?;
    let mut rows = 0;
    for order in ORDERS {
        let user_id = user_id_by_email(conn, order.user_email).await?;
        let order_id: i32 = sqlx::query_scalar(
            "SELECT order_id FROM orders WHERE user_id = $1 AND status = $2 ORDER BY order_id LIMIT 1",
        )
        .bind(user_id)
        .bind(order.status.as_str())
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| SeedError::MissingReference {
            table: "order_items",
            entity: "order",
            key: format!("{} ({})", order.user_email, order.status.as_str()),
        })?;

        for item in order.items {
            let (product_id, unit_price) = products
                .get(item.product)
                .copied()
                .ok_or_else(|| missing_product(item.product))?;
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price) VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(product_id)
            .bind(item.quantity)
            .bind(unit_price)
            .execute(&mut *conn)
            .await?;
            rows += 1;
        }
    }
    Ok(rows)
}

/// product name → (product_id, price)
async fn product_lookup(conn: &mut PgConnection) -> Result<HashMap<String, (i32, f64)>, SeedError> {
    let rows: Vec<(String, i32, f64)> =
        sqlx::query_as("SELECT name, product_id, price FROM products ORDER BY product_id")
            .fetch_all(&mut *conn)
            .await?;
    let mut lookup = HashMap::with_capacity(rows.len());
    for (name, id, price) in rows {
        // First row wins when names repeat.
        lookup.entry(name).or_insert((id, price));
    }
    Ok(lookup)
}

async fn user_id_by_email(conn: &mut PgConnection, email: &str) -> Result<i32, SeedError> {
    sqlx::query_scalar("SELECT user_id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| SeedError::MissingReference {
            table: "orders",
            entity: "user",
            key: email.to_string(),
        })
}

fn missing_product(name: &str) -> SeedError {
    SeedError::MissingReference {
        table: "order_items",
        entity: "product",
        key: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn catalog_price(name: &str) -> Option<f64> {
        PRODUCTS.iter().find(|p| p.name == name).map(|p| p.price)
    }

    #[test]
    fn user_emails_are_unique() {
        let emails: HashSet<_> = USERS.iter().map(|u| u.email).collect();
        assert_eq!(emails.len(), USERS.len());
    }

    #[test]
    fn orders_reference_seeded_users() {
        for order in ORDERS {
            assert!(
                USERS.iter().any(|u| u.email == order.user_email),
                "unknown user {}",
                order.user_email
            );
        }
    }

    #[test]
    fn items_reference_seeded_products_with_positive_quantity() {
        for item in ORDERS.iter().flat_map(|o| o.items) {
            assert!(catalog_price(item.product).is_some(), "unknown product {}", item.product);
            assert!(item.quantity > 0);
        }
    }

    #[test]
    fn products_respect_check_constraints() {
        for product in PRODUCTS {
            assert!(product.price >= 0.0);
            assert!(product.stock >= 0);
        }
    }

    #[test]
    fn order_owner_and_status_identify_each_order() {
        let keys: HashSet<_> = ORDERS
            .iter()
            .map(|o| (o.user_email, o.status.as_str()))
            .collect();
        assert_eq!(keys.len(), ORDERS.len());
    }

    #[test]
    fn order_totals_sum_lines() {
        let totals: Vec<f64> = ORDERS
            .iter()
            .map(|o| o.total(catalog_price).unwrap())
            .collect();
        assert!((totals[0] - 64.97).abs() < 1e-9);
        assert!((totals[1] - 139.98).abs() < 1e-9);
        assert!((totals[2] - 129.99).abs() < 1e-9);
    }

    #[test]
    fn total_fails_on_unknown_product() {
        let err = ORDERS[0].total(|_| None).unwrap_err();
        assert!(matches!(
            err,
            SeedError::MissingReference { entity: "product", .. }
        ));
    }

    #[test]
    fn report_sums_inserted_rows() {
        let report = SeedReport {
            tables: vec![
                ("users", TableOutcome::Skipped { existing: 5 }),
                ("products", TableOutcome::Inserted { rows: 5 }),
                ("orders", TableOutcome::Inserted { rows: 3 }),
            ],
        };
        assert_eq!(report.inserted_rows(), 8);
        assert_eq!(
            report.outcome("users"),
            Some(&TableOutcome::Skipped { existing: 5 })
        );
        assert_eq!(report.outcome("order_items"), None);
    }
}
