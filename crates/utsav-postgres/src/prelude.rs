//! Prelude module for utsav-postgres.
//!
//! This module re-exports the most commonly used types and traits from utsav-postgres,
//! making it easy to import everything you need with a single `use` statement.
//!
//! # Example
//!
//! ```rust,no_run
//! use utsav_postgres::prelude::*;
//!
//! # async fn example() -> PgResult<()> {
//! let config = PgConfig::new("postgresql://localhost/utsav");
//! let client = config.build()?;
//! # Ok(())
//! # }
//! ```

// Common query traits
pub use diesel::prelude::*;
pub use diesel_async::RunQueryDsl;

// Client types
pub use crate::client::{ConnectionPool, PgClient, PgClientExt, PgConfig, PgConn, PgPoolStatus};
// Models and repositories
pub use crate::model::{Account, NewAccount};
pub use crate::query::{AccountRepository, Pagination};
// Connection type
pub use crate::PgConnection;
// Error types
pub use crate::{PgError, PgResult};
