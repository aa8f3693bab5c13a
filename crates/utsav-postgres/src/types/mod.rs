//! Contains constraint violation types and categories.

mod constraints;

pub use constraints::{AccountConstraints, ConstraintCategory, ConstraintViolation};
