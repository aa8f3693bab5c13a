//! Enhanced HTTP request extractors with improved error handling and validation.
//!
//! This module provides custom Axum extractors that enhance the default
//! functionality with better error messages, validation, logging, and
//! type safety. All extractors are designed to be drop-in replacements for
//! their standard Axum counterparts.
//!
//! # Extractor Categories
//!
//! ## Authentication
//!
//! - [`AuthHeader`] - JWT bearer token extraction and validation
//! - [`AuthClaims`] - JWT claims with application-specific fields
//!
//! ## Request Data Extraction
//!
//! - [`Json`] - Enhanced JSON deserialization with better error messages
//! - [`ValidateJson`] - JSON extraction with automatic validation

// Authentication
pub mod auth;

// Request Data Extraction
pub mod reject;

pub use crate::extract::auth::{AuthClaims, AuthHeader};
pub use crate::extract::reject::{Json, ValidateJson};
