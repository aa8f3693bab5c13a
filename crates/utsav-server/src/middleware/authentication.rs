//! Authentication middleware for validating request credentials.
//!
//! This module provides middleware for verifying that requests contain valid
//! authentication tokens.

use axum::Router;
use axum::extract::Request;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;

use crate::extract::AuthHeader;
use crate::service::ServiceState;

/// Extension trait for `axum::`[`Router`] to apply authentication middleware.
///
/// This trait provides a convenient method to add authentication requirements
/// to a router, ensuring all routes require a valid bearer token.
pub trait RouterAuthExt {
    /// Requires valid authentication for all routes.
    ///
    /// This middleware validates the `Authorization` header and ensures
    /// the request has a valid signed token before proceeding.
    fn with_authentication(self, state: ServiceState) -> Self;
}

impl RouterAuthExt for Router<ServiceState> {
    fn with_authentication(self, state: ServiceState) -> Self {
        self.route_layer(from_fn_with_state(state, require_authentication))
    }
}

/// Requires a valid authentication token to proceed with the request.
///
/// The [`AuthHeader`] extractor performs the actual validation; requests
/// without a valid token are rejected before the handler runs. The decoded
/// header is cached in request extensions, so handlers extracting
/// [`AuthHeader`] again do not re-parse the token.
pub async fn require_authentication(_: AuthHeader, request: Request, next: Next) -> Response {
    next.run(request).await
}
