//! Authentication extractors.
//!
//! This module provides bearer token handling for the API:
//!
//! - [`AuthHeader`] - token extractor and response generator
//! - [`AuthClaims`] - signed token claims structure

mod auth_claims;
mod auth_header;

pub use self::auth_claims::AuthClaims;
pub use self::auth_header::AuthHeader;
