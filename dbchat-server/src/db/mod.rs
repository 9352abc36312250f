//! Database layer - connection pool and relationship queries
//!
//! - One `Database` per process, constructed explicitly and cloned into
//!   whatever needs it (the clone shares the pool)
//! - Units of work are transactions: commit explicitly, drop rolls back
//! - Relationships are explicit FK columns plus join helpers in `repos`

pub mod pool;
pub mod repos;

pub use pool::Database;
pub use repos::{DbError, OrderRepo, ProductRepo, UserRepo};
