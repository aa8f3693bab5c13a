//! Account handlers for the protected API surface.
//!
//! All responses use the sanitized [`AccountProfile`] projection; the
//! password hash never leaves the credential store layer.

use axum::Router;
use axum::extract::{Query, State};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use utsav_postgres::PgClient;
use utsav_postgres::query::{AccountRepository, Pagination};

use crate::extract::{AuthHeader, Json};
use crate::handler::{AccountProfile, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for account operations.
const TRACING_TARGET: &str = "utsav_server::handler::accounts";

/// Pagination query parameters for listing endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationQuery {
    /// Page number, 1-based.
    pub page: Option<i64>,
    /// Number of records per page.
    pub page_size: Option<i64>,
}

impl From<PaginationQuery> for Pagination {
    fn from(query: PaginationQuery) -> Self {
        Pagination::from_page(query.page.unwrap_or(1), query.page_size.unwrap_or(50))
    }
}

/// Returns the profile of the authenticated account.
#[tracing::instrument(skip_all)]
async fn fetch_account(
    State(pg_client): State<PgClient>,
    auth_header: AuthHeader,
) -> Result<Json<AccountProfile>> {
    let auth_claims = auth_header.into_auth_claims();

    let mut conn = pg_client.get_connection().await?;
    let account = conn.find_account_by_id(auth_claims.account_id).await?;

    let Some(account) = account else {
        // Token outlived the account it was issued for
        tracing::warn!(
            target: TRACING_TARGET,
            account_id = %auth_claims.account_id,
            "authenticated account no longer exists"
        );

        return Err(ErrorKind::NotFound
            .with_message("Account not found")
            .with_resource("account"));
    };

    Ok(Json(AccountProfile::from(account)))
}

/// Lists accounts with pagination, most recent first.
#[tracing::instrument(skip_all)]
async fn list_accounts(
    State(pg_client): State<PgClient>,
    _auth_header: AuthHeader,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Vec<AccountProfile>>> {
    let mut conn = pg_client.get_connection().await?;
    let accounts = conn.list_accounts(pagination.into()).await?;

    let profiles = accounts.into_iter().map(AccountProfile::from).collect();
    Ok(Json(profiles))
}

/// Response carrying the total number of accounts.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
struct AccountCountResponse {
    /// Total number of registered accounts.
    pub count: i64,
}

/// Returns the total number of registered accounts.
#[tracing::instrument(skip_all)]
async fn count_accounts(
    State(pg_client): State<PgClient>,
    _auth_header: AuthHeader,
) -> Result<Json<AccountCountResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let count = conn.count_accounts().await?;

    Ok(Json(AccountCountResponse { count }))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/account", get(fetch_account))
        .route("/accounts", get(list_accounts))
        .route("/accounts/count", get(count_accounts))
}
