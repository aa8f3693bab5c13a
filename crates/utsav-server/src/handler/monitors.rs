//! System health monitoring handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use utsav_postgres::PgClient;

use crate::extract::Json;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "utsav_server::handler::monitors";

/// Connection pool statistics reported by the health endpoint.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PoolStatusResponse {
    /// Maximum number of connections in the pool.
    pub max_size: usize,
    /// Current number of connections in the pool.
    pub size: usize,
    /// Number of available connections.
    pub available: usize,
    /// Number of requests waiting for a connection.
    pub waiting: usize,
}

/// Response returned by the health endpoint.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    /// Whether the service considers itself healthy.
    pub is_healthy: bool,
    /// Credential store connection pool status.
    pub pool: PoolStatusResponse,
    /// Timestamp when the status was computed.
    pub updated_at: Timestamp,
}

/// Public liveness endpoint reporting connection pool status.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(pg_client): State<PgClient>,
) -> (StatusCode, Json<HealthResponse>) {
    let pool_status = pg_client.pool_status();
    let is_healthy = !pool_status.is_under_pressure();

    let response = HealthResponse {
        is_healthy,
        pool: PoolStatusResponse {
            max_size: pool_status.max_size,
            size: pool_status.size,
            available: pool_status.available,
            waiting: pool_status.waiting,
        },
        updated_at: Timestamp::now(),
    };

    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        is_healthy,
        pool_utilization = pool_status.utilization(),
        "health status check"
    );

    (status_code, Json(response))
}

/// Returns a [`Router`] with all health monitoring routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn health_endpoint_reports_healthy() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let status: serde_json::Value = response.json();
        assert_eq!(status["isHealthy"], true);
        assert!(status["pool"]["maxSize"].as_u64().is_some());

        Ok(())
    }
}
