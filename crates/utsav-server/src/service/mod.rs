//! Service layer: configuration, shared state and security primitives.
//!
//! # Key Types
//!
//! - [`ServiceConfig`] - validated configuration for all external collaborators
//! - [`ServiceState`] - shared application state for dependency injection
//! - [`PasswordHasher`] - Argon2id password hashing
//! - [`TokenKeys`] - bearer token signing keys

pub mod security;

mod service_config;
mod service_state;

pub use self::security::{PasswordHasher, TokenKeys};
pub use self::service_config::{ServiceConfig, ServiceConfigBuilder};
pub use self::service_state::ServiceState;
