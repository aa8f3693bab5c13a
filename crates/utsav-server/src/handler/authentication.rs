//! Authentication handlers for user signup and login.
//!
//! Signup performs a single atomic insert against the unique indexes of the
//! credential store; a racing duplicate surfaces as a constraint violation
//! that is translated into a conflict response. Login collapses every
//! credential failure into one generic message so callers cannot probe
//! which accounts exist.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use serde::{Deserialize, Serialize};
use utsav_postgres::PgClient;
use utsav_postgres::model::NewAccount;
use utsav_postgres::query::AccountRepository;
use validator::Validate;

use crate::extract::{AuthClaims, AuthHeader, Json, ValidateJson};
use crate::handler::{AccountProfile, Error, ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState, TokenKeys};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "utsav_server::handler::authentication";

/// Generic credential failure returned for every login mismatch.
///
/// The same message is used whether the email was unknown or the password
/// was wrong, closing the account-enumeration side channel.
fn invalid_credentials() -> Error<'static> {
    ErrorKind::Unauthorized
        .with_message("Invalid email or password")
        .with_resource("authentication")
}

/// Hashes a password on the blocking thread pool.
///
/// Argon2id is CPU-bound; running it on the async executor would stall
/// concurrent request handling.
async fn hash_password_blocking(hasher: PasswordHasher, password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hasher.hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "password hashing task failed"
            );

            ErrorKind::InternalServerError
                .with_message("Password processing failed")
                .with_resource("authentication")
        })?
}

/// Verifies a password against a stored hash on the blocking thread pool.
async fn verify_password_blocking(
    hasher: PasswordHasher,
    password: String,
    stored_hash: String,
) -> Result<()> {
    tokio::task::spawn_blocking(move || hasher.verify_password(&password, &stored_hash))
        .await
        .map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "password verification task failed"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication temporarily unavailable")
                .with_resource("authentication")
        })?
}

/// Request payload for signup.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
struct SignupRequest {
    /// Unique username of the new account.
    #[validate(length(min = 1, max = 32))]
    pub username: String,
    /// Email address of the new account.
    #[validate(email)]
    pub email: String,
    /// Plaintext password; hashed before it reaches the store.
    #[validate(length(min = 1))]
    pub password: String,
    /// Role of the new account (e.g. "organizer", "user").
    #[validate(length(min = 1))]
    pub role: String,
    /// Contact phone number; required but not format-validated.
    #[validate(length(min = 1))]
    pub phone: String,
}

/// Response returned after successful signup.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
struct SignupResponse {
    /// Confirmation message for the caller.
    pub message: String,
}

/// Creates a new account.
///
/// The password is hashed on the blocking pool, then the record is written
/// with a single atomic insert. Uniqueness of username and email is enforced
/// by the database; there is no separate existence check that a concurrent
/// signup could race past.
#[tracing::instrument(skip_all)]
async fn signup(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    ValidateJson(request): ValidateJson<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        username = %request.username,
        email = %request.email,
        "signup attempt"
    );

    let password_hash = hash_password_blocking(password_hasher, request.password).await?;

    let new_account = NewAccount {
        username: request.username,
        email_address: request.email,
        password_hash,
        account_role: request.role,
        phone_number: request.phone,
    };

    let mut conn = pg_client.get_connection().await?;
    let account = conn.create_account(new_account).await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        username = %account.username,
        account_role = %account.account_role,
        "account created"
    );

    let response = SignupResponse {
        message: "Signup successful. Please log in.".to_owned(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
struct LoginRequest {
    /// Email address of the account.
    #[validate(email)]
    pub email: String,
    /// Password of the account.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response returned after successful login.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
struct LoginResponse {
    /// Signed bearer token, valid for one hour.
    pub token: String,
    /// Sanitized projection of the authenticated account.
    pub user: AccountProfile,
}

/// Verifies credentials and issues a bearer token.
///
/// When no account matches the email, a dummy verification runs at full
/// cost so the response time does not reveal whether the account exists.
#[tracing::instrument(skip_all)]
async fn login(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(token_keys): State<TokenKeys>,
    ValidateJson(request): ValidateJson<LoginRequest>,
) -> Result<(StatusCode, AuthHeader, Json<LoginResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        email = %request.email,
        "login attempt"
    );

    let mut conn = pg_client.get_connection().await?;
    let account = conn.find_account_by_email(&request.email).await?;

    let Some(account) = account else {
        // Equalize timing with a full-cost verification against a random hash
        let hasher = password_hasher.clone();
        let password = request.password;
        let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy_password(&password)).await;

        tracing::warn!(
            target: TRACING_TARGET,
            email = %request.email,
            "login failed: no matching account"
        );

        return Err(invalid_credentials());
    };

    verify_password_blocking(
        password_hasher,
        request.password,
        account.password_hash.clone(),
    )
    .await
    .map_err(|error| {
        if error.kind() == ErrorKind::Unauthorized {
            tracing::warn!(
                target: TRACING_TARGET,
                account_id = %account.id,
                "login failed: password mismatch"
            );
            invalid_credentials()
        } else {
            error
        }
    })?;

    let auth_claims = AuthClaims::new(&account);
    let auth_header = AuthHeader::new(auth_claims, token_keys);
    let token = auth_header.bearer_token()?;

    tracing::info!(
        target: TRACING_TARGET,
        token_id = %auth_header.as_auth_claims().token_id,
        account_id = %account.id,
        "login successful: token issued"
    );

    let response = LoginResponse {
        token,
        user: AccountProfile::from(account),
    };

    Ok((StatusCode::OK, auth_header, Json(response)))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn signup_rejects_missing_fields() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        // Password absent entirely
        let request = serde_json::json!({
            "username": "alice",
            "email": "a@x.com",
            "role": "user",
            "phone": "555-0100"
        });

        let response = server.post("/signup").json(&request).await;
        response.assert_status_bad_request();

        Ok(())
    }

    #[tokio::test]
    async fn signup_rejects_empty_fields() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let request = serde_json::json!({
            "username": "alice",
            "email": "a@x.com",
            "password": "",
            "role": "user",
            "phone": "555-0100"
        });

        let response = server.post("/signup").json(&request).await;
        response.assert_status_bad_request();

        Ok(())
    }

    #[tokio::test]
    async fn signup_rejects_invalid_email() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let request = serde_json::json!({
            "username": "alice",
            "email": "not-an-email",
            "password": "Secr3t!",
            "role": "user",
            "phone": "555-0100"
        });

        let response = server.post("/signup").json(&request).await;
        response.assert_status_bad_request();

        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_missing_password() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let request = serde_json::json!({
            "email": "a@x.com"
        });

        let response = server.post("/login").json(&request).await;
        response.assert_status_bad_request();

        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_non_json_body() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server.post("/login").text("email=a@x.com").await;
        response.assert_status_bad_request();

        Ok(())
    }
}
