//! Command implementations for the dbchat CLI

pub mod args;
pub mod ask;
pub mod init_db;
pub mod serve;
pub mod start;
pub mod wait_db;

pub use ask::run_ask;
pub use init_db::run_init_db;
pub use serve::run_serve;
pub use start::run_start;
pub use wait_db::run_wait_db;
