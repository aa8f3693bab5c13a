//! End-to-end authentication flow tests against a real database.
//!
//! These tests exercise the full signup/login lifecycle through the HTTP
//! surface, including the database unique indexes. They require a running
//! PostgreSQL instance: set `TEST_POSTGRES_URL` (directly or via `.env`)
//! to enable them, otherwise each test is skipped.

use axum_test::TestServer;
use serde_json::{Value, json};
use utsav_postgres::PgClientExt;
use utsav_server::handler::routes;
use utsav_server::service::{ServiceConfig, ServiceState};
use uuid::Uuid;

/// Builds application state against the database named by `TEST_POSTGRES_URL`.
///
/// Returns `None` when the variable is unset so tests can skip gracefully.
async fn create_test_state() -> anyhow::Result<Option<ServiceState>> {
    dotenvy::dotenv().ok();
    let Ok(postgres_url) = std::env::var("TEST_POSTGRES_URL") else {
        eprintln!("TEST_POSTGRES_URL is not set; skipping integration test");
        return Ok(None);
    };

    let config = ServiceConfig::builder()
        .with_postgres_url(postgres_url)
        .with_auth_token_secret("integration-test-token-secret-0123456789")
        .build()?;

    let state = ServiceState::from_config(&config)?;
    state.pg_client().run_pending_migrations().await?;

    Ok(Some(state))
}

/// Builds a test server against the database named by `TEST_POSTGRES_URL`.
async fn create_test_server() -> anyhow::Result<Option<TestServer>> {
    let Some(state) = create_test_state().await? else {
        return Ok(None);
    };

    let app = routes(state.clone()).with_state(state);
    Ok(Some(TestServer::new(app)?))
}

/// Returns a short unique tag so repeated test runs never collide on the
/// unique indexes.
fn unique_tag() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_owned()
}

#[tokio::test]
async fn signup_login_round_trip() -> anyhow::Result<()> {
    let Some(server) = create_test_server().await? else {
        return Ok(());
    };

    let tag = unique_tag();
    let username = format!("alice_{tag}");
    let email = format!("alice_{tag}@example.com");

    // Signup succeeds exactly once
    let response = server
        .post("/signup")
        .json(&json!({
            "username": username,
            "email": email,
            "password": "Secr3t!",
            "role": "user",
            "phone": "555-0100"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

    // Login with the same credentials succeeds
    let response = server
        .post("/login")
        .json(&json!({ "email": email, "password": "Secr3t!" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let token = body["token"].as_str().expect("login must return a token");
    assert!(!token.is_empty());
    assert_eq!(body["user"]["emailAddress"], email.as_str());
    assert_eq!(body["user"]["username"], username.as_str());
    assert_eq!(body["user"]["accountRole"], "user");

    // The sanitized projection never carries credential material
    let user = body["user"].as_object().expect("user must be an object");
    assert!(!user.keys().any(|k| k.to_lowercase().contains("password")));

    // The issued token opens the protected surface
    let response = server
        .get("/account")
        .add_header("authorization", format!("Bearer {token}"))
        .await;
    response.assert_status_ok();

    let profile: Value = response.json();
    assert_eq!(profile["emailAddress"], email.as_str());

    Ok(())
}

#[tokio::test]
async fn login_failures_are_generic() -> anyhow::Result<()> {
    let Some(server) = create_test_server().await? else {
        return Ok(());
    };

    let tag = unique_tag();
    let email = format!("bob_{tag}@example.com");

    server
        .post("/signup")
        .json(&json!({
            "username": format!("bob_{tag}"),
            "email": email,
            "password": "CorrectHorse1!",
            "role": "user",
            "phone": "555-0101"
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    // Wrong password and unknown email produce the same response shape
    let wrong_password = server
        .post("/login")
        .json(&json!({ "email": email, "password": "wrong" }))
        .await;
    wrong_password.assert_status_unauthorized();

    let unknown_email = server
        .post("/login")
        .json(&json!({
            "email": format!("nobody_{tag}@example.com"),
            "password": "CorrectHorse1!"
        }))
        .await;
    unknown_email.assert_status_unauthorized();

    let wrong_body: Value = wrong_password.json();
    let unknown_body: Value = unknown_email.json();
    assert_eq!(wrong_body["name"], unknown_body["name"]);
    assert_eq!(wrong_body["message"], unknown_body["message"]);

    Ok(())
}

#[tokio::test]
async fn duplicate_signups_conflict() -> anyhow::Result<()> {
    let Some(server) = create_test_server().await? else {
        return Ok(());
    };

    let tag = unique_tag();
    let username = format!("carol_{tag}");
    let email = format!("carol_{tag}@example.com");

    server
        .post("/signup")
        .json(&json!({
            "username": username,
            "email": email,
            "password": "Secr3t!",
            "role": "organizer",
            "phone": "555-0102"
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    // Same username, different email
    let response = server
        .post("/signup")
        .json(&json!({
            "username": username,
            "email": format!("other_{tag}@example.com"),
            "password": "Secr3t!",
            "role": "organizer",
            "phone": "555-0102"
        }))
        .await;
    response.assert_status_conflict();

    // Same email, different username
    let response = server
        .post("/signup")
        .json(&json!({
            "username": format!("other_{tag}"),
            "email": email,
            "password": "Secr3t!",
            "role": "organizer",
            "phone": "555-0102"
        }))
        .await;
    response.assert_status_conflict();

    // The original record is intact and still logs in
    server
        .post("/login")
        .json(&json!({ "email": email, "password": "Secr3t!" }))
        .await
        .assert_status_ok();

    Ok(())
}

#[tokio::test]
async fn email_lookup_is_case_insensitive() -> anyhow::Result<()> {
    let Some(server) = create_test_server().await? else {
        return Ok(());
    };

    let tag = unique_tag();

    server
        .post("/signup")
        .json(&json!({
            "username": format!("dave_{tag}"),
            "email": format!("Dave_{tag}@Example.COM"),
            "password": "Secr3t!",
            "role": "user",
            "phone": "555-0103"
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    // Lowercase login works against the normalized stored address
    server
        .post("/login")
        .json(&json!({
            "email": format!("dave_{tag}@example.com"),
            "password": "Secr3t!"
        }))
        .await
        .assert_status_ok();

    Ok(())
}

#[tokio::test]
async fn account_listing_requires_token_and_sanitizes() -> anyhow::Result<()> {
    let Some(server) = create_test_server().await? else {
        return Ok(());
    };

    let tag = unique_tag();
    let email = format!("erin_{tag}@example.com");

    server
        .post("/signup")
        .json(&json!({
            "username": format!("erin_{tag}"),
            "email": email,
            "password": "Secr3t!",
            "role": "user",
            "phone": "555-0104"
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let login: Value = server
        .post("/login")
        .json(&json!({ "email": email, "password": "Secr3t!" }))
        .await
        .json();
    let token = login["token"].as_str().expect("login must return a token");

    // Unauthenticated listing is rejected
    server.get("/accounts").await.assert_status_unauthorized();

    // Authenticated listing returns sanitized profiles
    let response = server
        .get("/accounts")
        .add_header("authorization", format!("Bearer {token}"))
        .await;
    response.assert_status_ok();

    let accounts: Value = response.json();
    let accounts = accounts.as_array().expect("listing must be an array");
    assert!(!accounts.is_empty());
    for account in accounts {
        let fields = account.as_object().expect("profile must be an object");
        assert!(!fields.keys().any(|k| k.to_lowercase().contains("password")));
    }

    // The counter includes at least this account
    let response = server
        .get("/accounts/count")
        .add_header("authorization", format!("Bearer {token}"))
        .await;
    response.assert_status_ok();

    let count: Value = response.json();
    assert!(count["count"].as_i64().is_some_and(|c| c >= 1));

    Ok(())
}

#[tokio::test]
async fn repository_lookups_use_normalized_identity() -> anyhow::Result<()> {
    use utsav_postgres::model::NewAccount;
    use utsav_postgres::query::AccountRepository;

    let Some(state) = create_test_state().await? else {
        return Ok(());
    };

    let tag = unique_tag();
    let mut conn = state.pg_client().get_connection().await?;

    let account = conn
        .create_account(NewAccount {
            username: format!("  frank_{tag}  "),
            email_address: format!("Frank_{tag}@Example.COM"),
            password_hash: "$argon2id$placeholder".to_owned(),
            account_role: "user".to_owned(),
            phone_number: "555-0105".to_owned(),
        })
        .await?;

    // Identity fields are normalized at the store boundary
    assert_eq!(account.username, format!("frank_{tag}"));
    assert_eq!(account.email_address, format!("frank_{tag}@example.com"));

    let by_username = conn.find_account_by_username(&format!("frank_{tag}")).await?;
    assert_eq!(by_username.map(|a| a.id), Some(account.id));

    let by_email = conn
        .find_account_by_email(&format!("FRANK_{tag}@example.com"))
        .await?;
    assert_eq!(by_email.map(|a| a.id), Some(account.id));

    let by_id = conn.find_account_by_id(account.id).await?;
    assert_eq!(by_id.map(|a| a.username), Some(account.username));

    Ok(())
}
