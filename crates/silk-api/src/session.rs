//! Session layer configuration.
//!
//! Sessions live server-side in the store's SQLite file; the browser only
//! holds the opaque session id cookie.

use silk_core::ShopError;
use sqlx::SqlitePool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::state::AppConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "silk_session";

/// Remembered logins expire after 30 days without a request.
const SESSION_EXPIRY_DAYS: i64 = 30;

/// Session keys.
pub mod keys {
    /// Email of the logged-in user.
    pub const USER_EMAIL: &str = "user_email";
}

/// Create the session layer backed by the `tower_sessions` table.
///
/// # Errors
///
/// Returns `ShopError::Session` if the session table cannot be created.
pub async fn create_session_layer(
    pool: &SqlitePool,
    config: &AppConfig,
) -> Result<SessionManagerLayer<SqliteStore>, ShopError> {
    let store = SqliteStore::new(pool.clone());
    store
        .migrate()
        .await
        .map_err(|e| ShopError::Session(format!("session table migration failed: {e}")))?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::days(SESSION_EXPIRY_DAYS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/"))
}

pub(crate) fn session_error(e: tower_sessions::session::Error) -> ShopError {
    ShopError::Session(e.to_string())
}
