//! Database models for all entities in the system.
//!
//! This module contains Diesel model definitions for all database tables,
//! including structs for querying and inserting records.

mod account;

pub use account::{Account, NewAccount};
