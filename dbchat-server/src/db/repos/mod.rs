//! Read-side repositories
//!
//! The application never mutates shop data outside the seeder, so these
//! are queries only. Relationship traversal ("a user's orders", "an order's
//! items") is an explicit JOIN or FK lookup here rather than lazy loading.

pub mod orders;
pub mod products;
pub mod users;

pub use orders::{OrderLine, OrderRepo, UserSales};
pub use products::ProductRepo;
pub use users::UserRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}
