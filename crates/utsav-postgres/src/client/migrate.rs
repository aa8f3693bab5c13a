//! Database migration management.
//!
//! Applies the embedded schema migrations through an extension trait on
//! [`PgClient`]. Migration execution happens on the blocking thread pool
//! since the diesel migration harness is synchronous.

use std::future::Future;
use std::time::{Duration, Instant};

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, PooledConnection, TRACING_TARGET_MIGRATION};

/// Outcome of a migration run.
#[derive(Debug, Clone)]
pub struct MigrationResult {
    /// Versions of the migrations applied during this run, in order.
    pub applied: Vec<String>,
    /// Wall-clock duration of the migration run.
    pub duration: Duration,
}

impl MigrationResult {
    /// Returns the number of migrations applied during this run.
    #[inline]
    pub fn count(&self) -> usize {
        self.applied.len()
    }

    /// Returns whether the schema was already up to date.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Run all pending migrations on the database.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        "Starting database migration process",
    );

    let start_time = Instant::now();
    let conn = pg.get_pooled_connection().await?;
    let mut conn: AsyncConnectionWrapper<PooledConnection> = conn.into();

    let results = spawn_blocking(move || {
        conn.run_pending_migrations(MIGRATIONS).map(|versions| {
            versions
                .into_iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
        })
    })
    .await;

    let duration = start_time.elapsed();
    let results = results.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "Migration task panicked, join error occurred"
        );

        PgError::Migration(err.into())
    })?;

    let versions = results.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "Database migration process failed"
        );

        PgError::Migration(err)
    })?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        migrations_count = versions.len(),
        "Database migration process completed successfully"
    );

    Ok(MigrationResult {
        applied: versions,
        duration,
    })
}

/// Extension trait providing migration functionality for [`PgClient`].
///
/// This trait adds methods for managing database migrations, keeping
/// migration-related functionality separate from the core database client
/// implementation.
pub trait PgClientExt {
    /// Runs all pending database migrations.
    ///
    /// This method will apply any unapplied migrations to bring the database schema
    /// up to date. It's safe to call this method multiple times.
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails to apply or if there are
    /// connectivity issues with the database.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>>;
}

impl PgClientExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        run_pending_migrations(self).await
    }
}
