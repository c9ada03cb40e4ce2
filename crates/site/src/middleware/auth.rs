//! Authentication extractors and route guards.
//!
//! [`crate::services::AuthContext`] is extracted on every request and
//! passed down to the services; [`RequireAuth`] and [`RequireAdmin`] are
//! the routing-layer guards that redirect browsers to the right place.
//! The guards are a convenience only - the services re-check capabilities
//! at their own boundary.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};
use crate::services::AuthContext;

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(user.map_or_else(Self::anonymous, Self::for_user))
    }
}

/// Extractor that requires a signed-in user.
///
/// Anonymous requests are redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection for [`RequireAuth`]: redirect to the login page.
pub struct RedirectToLogin;

impl IntoResponse for RedirectToLogin {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = RedirectToLogin;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state)
            .await
            .unwrap_or_default();

        match ctx.user() {
            Some(user) => Ok(Self(user.clone())),
            None => Err(RedirectToLogin),
        }
    }
}

/// Extractor that requires a signed-in admin.
///
/// Anonymous requests go to the login page; signed-in non-admins go back
/// to the dashboard landing page.
pub struct RequireAdmin(pub CurrentUser);

/// Rejection for [`RequireAdmin`].
pub enum AdminRejection {
    /// Not signed in at all.
    ToLogin,
    /// Signed in but not an admin.
    ToDashboard,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::ToLogin => Redirect::to("/login").into_response(),
            Self::ToDashboard => Redirect::to("/dashboard").into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state)
            .await
            .unwrap_or_default();

        match ctx.user() {
            Some(user) if user.is_admin() => Ok(Self(user.clone())),
            Some(_) => Err(AdminRejection::ToDashboard),
            None => Err(AdminRejection::ToLogin),
        }
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
