//! Google OAuth route handlers.
//!
//! `/auth/google` sends the browser to the consent screen with a CSRF
//! state token pinned in the session; the callback checks the state,
//! exchanges the code, and ensures the user record exists (created once,
//! default role `user`).

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;

use crate::middleware::set_current_user;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Query parameters for the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Start the Google sign-in round trip.
pub async fn google_login(State(state): State<AppState>, session: Session) -> Response {
    let Some(google) = state.google() else {
        return Redirect::to("/login?error=google_disabled").into_response();
    };

    let csrf_token = generate_state_token();
    if let Err(e) = session
        .insert(session_keys::OAUTH_STATE, &csrf_token)
        .await
    {
        tracing::error!("Failed to store OAuth state: {e}");
        return Redirect::to("/login?error=session").into_response();
    }

    Redirect::to(&google.authorize_url(&csrf_token)).into_response()
}

/// Handle the Google OAuth callback.
pub async fn google_callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(google) = state.google() else {
        return Redirect::to("/login?error=google_disabled").into_response();
    };

    let stored_state: Option<String> = session
        .remove(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if let Some(error) = query.error {
        tracing::warn!("Google sign-in declined: {error}");
        return Redirect::to("/login?error=google").into_response();
    }

    let (Some(code), Some(returned_state)) = (query.code, query.state) else {
        return Redirect::to("/login?error=google").into_response();
    };

    if stored_state.as_deref() != Some(returned_state.as_str()) {
        tracing::warn!("OAuth state mismatch");
        return Redirect::to("/login?error=oauth_state").into_response();
    }

    let identity = match google.fetch_user(&code).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Google code exchange failed: {e}");
            return Redirect::to("/login?error=google").into_response();
        }
    };

    match state
        .auth()
        .sign_in_with_google(
            identity.name.as_deref(),
            &identity.email,
            identity.email_verified,
        )
        .await
    {
        Ok(user) => {
            if let Err(e) = set_current_user(&session, &CurrentUser::from(&user)).await {
                tracing::error!("Failed to set session after Google sign-in: {e}");
                return Redirect::to("/login?error=session").into_response();
            }
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!("Google sign-in failed: {e}");
            Redirect::to("/login?error=google").into_response()
        }
    }
}

/// Random URL-safe CSRF state token.
fn generate_state_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_tokens_are_unique_and_url_safe() {
        let a = generate_state_token();
        let b = generate_state_token();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
