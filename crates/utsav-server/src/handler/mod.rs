//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Routes are split into a private surface gated by the authentication
//! middleware (`/account`, `/accounts`, `/accounts/count`) and a public
//! surface (`/signup`, `/login`, `/health`).
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod accounts;
mod authentication;
mod error;
mod monitors;
mod response;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::{AccountProfile, ErrorResponse};
use crate::middleware::require_authentication;
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all private routes.
fn private_routes() -> Router<ServiceState> {
    accounts::routes()
}

/// Returns a [`Router`] with all public routes.
fn public_routes() -> Router<ServiceState> {
    authentication::routes().merge(monitors::routes())
}

/// Returns a [`Router`] with all routes.
///
/// Private routes are wrapped in the authentication middleware; unknown
/// paths fall back to a JSON 404 response.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    let require_authentication = from_fn_with_state(state, require_authentication);

    Router::new()
        .merge(private_routes().route_layer(require_authentication))
        .merge(public_routes())
        .fallback(fallback)
}

#[cfg(test)]
pub(crate) mod test {
    use axum::Router;
    use axum_test::TestServer;

    use crate::handler::routes;
    use crate::service::{ServiceConfig, ServiceState};

    /// Returns application state backed by the development configuration.
    ///
    /// Database connections are created lazily, so tests that never reach
    /// the store run without a live database.
    pub fn create_test_state() -> anyhow::Result<ServiceState> {
        let config = ServiceConfig::default();
        Ok(ServiceState::from_config(&config)?)
    }

    /// Returns a new [`TestServer`] with the given router.
    pub async fn create_test_server_with_router(
        router: Router<ServiceState>,
    ) -> anyhow::Result<TestServer> {
        let state = create_test_state()?;
        let app = router.with_state(state);
        Ok(TestServer::new(app)?)
    }

    /// Returns a new [`TestServer`] with the complete application router.
    pub async fn create_test_server() -> anyhow::Result<TestServer> {
        let state = create_test_state()?;
        let app = routes(state.clone()).with_state(state);
        Ok(TestServer::new(app)?)
    }

    #[tokio::test]
    async fn unknown_path_returns_not_found() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/does-not-exist").await;
        response.assert_status_not_found();

        Ok(())
    }

    #[tokio::test]
    async fn middleware_gates_private_routes() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/accounts").await;
        response.assert_status_unauthorized();

        Ok(())
    }

    #[tokio::test]
    async fn public_routes_skip_authentication() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        Ok(())
    }
}
