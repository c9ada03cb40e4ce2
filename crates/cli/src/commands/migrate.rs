//! Database migration command.
//!
//! Runs the embedded site migrations, then lets the tower-sessions store
//! create its own schema.

use tower_sessions_sqlx_store::PostgresStore;

use super::CommandError;

/// Run all site database migrations.
///
/// # Errors
///
/// Returns an error when the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running site migrations...");
    sqlx::migrate!("../site/migrations").run(&pool).await?;

    tracing::info!("Creating session store schema...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
