#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use utsav_postgres::PgClientExt;
use utsav_server::handler::routes;
use utsav_server::service::ServiceState;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "utsav_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "utsav_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "utsav_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate().context("invalid configuration")?;

    let state = create_service_state(&cli).await?;
    let router = routes(state.clone()).with_state(state);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state and brings the database schema up to date.
async fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    let state =
        ServiceState::from_config(&cli.service).context("failed to create service state")?;

    let migrations = state
        .pg_client()
        .run_pending_migrations()
        .await
        .context("failed to apply database migrations")?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        applied = migrations.count(),
        "database schema is up to date"
    );

    Ok(state)
}
