//! # silk-db
//!
//! SQLite persistence for silk-store.
//!
//! ## Tables
//!
//! - `user` - Credential store (email, password hash, authenticated flag)
//! - `items` - Catalog store (name, image, price, provider price reference)
//! - `tower_sessions` - Session records, owned by the session layer in `silk-api`
//!
//! Migrations live in `crates/silk-db/migrations/` and are embedded at build
//! time; `connect` applies them on startup.

pub mod auth;
pub mod items;
pub mod report;
pub mod users;

pub use auth::{hash_password, verify_password, AuthService};
pub use items::ItemRepository;
pub use report::{run_report, stock_report, StockReport, STOCK_REPORT_SQL};
pub use users::UserRepository;

use silk_core::ShopError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Default database location, next to the binary's working directory
pub const DEFAULT_DATABASE_URL: &str = "sqlite://silk-store.db?mode=rwc";

/// Open a connection pool and apply pending migrations.
///
/// # Errors
///
/// Returns `ShopError::Configuration` for an unparseable URL and
/// `ShopError::Database` if the file cannot be opened or migrated.
pub async fn connect(database_url: &str) -> Result<SqlitePool, ShopError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| ShopError::Configuration(format!("invalid DATABASE_URL: {e}")))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
        .map_err(db_error)?;

    migrate(&pool).await?;
    info!("Opened store at {}", database_url);
    Ok(pool)
}

/// Single-connection in-memory pool with migrations applied.
///
/// The connection is never recycled; an in-memory SQLite database only
/// lives as long as its connection.
pub async fn connect_in_memory() -> Result<SqlitePool, ShopError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| ShopError::Configuration(e.to_string()))?;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(db_error)?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Apply embedded migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<(), ShopError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| ShopError::Database(format!("migration failed: {e}")))
}

pub(crate) fn db_error(e: sqlx::Error) -> ShopError {
    ShopError::Database(e.to_string())
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_pool_has_schema() {
        let pool = connect_in_memory().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('user', 'items') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables, vec![("items".to_string(),), ("user".to_string(),)]);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        assert!(migrate(&pool).await.is_ok());
    }
}
