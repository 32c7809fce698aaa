//! Login gating.
//!
//! The session cookie maps to a stored email; these extractors turn that
//! back into a `User` and enforce the authenticated flag.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use silk_core::User;
use silk_db::AuthService;
use tower_sessions::Session;
use tracing::debug;

use crate::error::ApiError;
use crate::session::{keys, session_error};
use crate::state::AppState;

/// Where anonymous callers are sent.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireLogin(user): RequireLogin) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireLogin(pub User);

/// Rejection for `RequireLogin`.
pub enum LoginRejection {
    /// No session, unknown user, or the authenticated flag is cleared.
    RedirectToLogin,
    /// The session or user store failed.
    Failed(ApiError),
}

impl IntoResponse for LoginRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Failed(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireLogin {
    type Rejection = LoginRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match current_user(parts, state).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => {
                debug!("Anonymous request to {}", parts.uri.path());
                Err(LoginRejection::RedirectToLogin)
            }
            Err(err) => Err(LoginRejection::Failed(err)),
        }
    }
}

/// Extractor that optionally gets the logged-in user.
pub struct OptionalLogin(pub Option<User>);

impl FromRequestParts<AppState> for OptionalLogin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts, state).await?))
    }
}

async fn current_user(parts: &Parts, state: &AppState) -> Result<Option<User>, ApiError> {
    let Some(session) = parts.extensions.get::<Session>() else {
        return Ok(None);
    };

    let email: Option<String> = session
        .get(keys::USER_EMAIL)
        .await
        .map_err(session_error)?;
    let Some(email) = email else {
        return Ok(None);
    };

    let user = AuthService::new(&state.pool).load(&email).await?;
    Ok(user.filter(|u| u.authenticated))
}

/// Bind the session to a user, issuing a fresh session id first.
pub async fn set_current_user(session: &Session, user: &User) -> Result<(), ApiError> {
    session.cycle_id().await.map_err(session_error)?;
    session
        .insert(keys::USER_EMAIL, user.session_id())
        .await
        .map_err(session_error)?;
    Ok(())
}

/// Invalidate the session and its id.
pub async fn clear_current_user(session: &Session) -> Result<(), ApiError> {
    session.flush().await.map_err(session_error)?;
    Ok(())
}
