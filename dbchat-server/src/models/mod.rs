//! Request models with validation at construction
//!
//! User input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod question;
pub mod validation;

pub use question::Question;
pub use validation::ValidationError;
