//! HTTP middleware layers.
//!
//! # Key Items
//!
//! - [`require_authentication`] - gates routes behind bearer token verification
//! - [`RouterAuthExt`] - router extension for applying the authentication layer

mod authentication;

pub use self::authentication::{RouterAuthExt, require_authentication};
