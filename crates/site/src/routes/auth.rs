//! Authentication route handlers.
//!
//! Handles email/password login, registration, sign-out, and the email
//! verification round trip. Outcomes travel as `?error=`/`?success=`
//! notice codes; the unverified-email branch ends the session before
//! redirecting so no half-signed-in state survives.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthContext, AuthError};
use crate::state::AppState;

use super::MessageQuery;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for the verification link.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub google_enabled: bool,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
}

// =============================================================================
// Notice code mapping
// =============================================================================

fn login_error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_owned(),
        "unverified-email" => {
            "Your email address is not verified yet. Check your inbox for the verification link."
                .to_owned()
        }
        "invalid_token" => "This verification link is invalid or has expired.".to_owned(),
        "google" => "Google sign-in failed. Please try again.".to_owned(),
        "google_disabled" => "Google sign-in is not configured for this store.".to_owned(),
        "oauth_state" => "Sign-in expired, please try again.".to_owned(),
        "session" => "Session error, please try again.".to_owned(),
        _ => "Sign-in failed. Please try again.".to_owned(),
    }
}

fn login_success_message(code: &str) -> String {
    match code {
        "verified" => "Email verified! You can now sign in.".to_owned(),
        _ => "Done.".to_owned(),
    }
}

fn register_error_message(code: &str) -> String {
    match code {
        "password_mismatch" => "Passwords do not match.".to_owned(),
        "password_too_short" => "Password must be at least 8 characters.".to_owned(),
        "email_taken" => "An account with this email already exists.".to_owned(),
        "invalid_email" => "Please enter a valid email address.".to_owned(),
        _ => "Registration failed. Please try again.".to_owned(),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<MessageQuery>,
) -> Response {
    // Already signed in: nothing to do here.
    if ctx.user().is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    LoginTemplate {
        user: None,
        error: query.error.as_deref().map(login_error_message),
        success: query.success.as_deref().map(login_success_message),
        google_enabled: state.google().is_some(),
    }
    .into_response()
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth().sign_in(&form.email, &form.password).await {
        Ok(user) => {
            if let Err(e) = set_current_user(&session, &CurrentUser::from(&user)).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/login?error=session").into_response();
            }
            Redirect::to("/dashboard").into_response()
        }
        Err(AuthError::UnverifiedEmail) => {
            // Valid credentials, unverified address: sign the session
            // straight back out and surface the distinguished condition.
            if let Err(e) = session.flush().await {
                tracing::error!("Failed to flush session: {e}");
            }
            Redirect::to("/login?error=unverified-email").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Redirect::to("/login?error=credentials").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    ctx: AuthContext,
    Query(query): Query<MessageQuery>,
) -> Response {
    if ctx.user().is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    RegisterTemplate {
        user: None,
        error: query.error.as_deref().map(register_error_message),
    }
    .into_response()
}

/// Handle registration form submission.
///
/// Creates the account, sends the verification email, and leaves the new
/// user signed in - verification is informational until their next
/// password sign-in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/register?error=password_mismatch").into_response();
    }

    match state
        .auth()
        .sign_up(&form.name, &form.email, &form.password)
        .await
    {
        Ok(user) => {
            if let Err(e) = set_current_user(&session, &CurrentUser::from(&user)).await {
                tracing::error!("Failed to set session after sign-up: {e}");
                return Redirect::to("/login?error=session").into_response();
            }
            Redirect::to("/dashboard?success=registered").into_response()
        }
        Err(AuthError::UserAlreadyExists) => {
            Redirect::to("/register?error=email_taken").into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/register?error=password_too_short").into_response()
        }
        Err(AuthError::InvalidEmail(_)) => {
            Redirect::to("/register?error=invalid_email").into_response()
        }
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            Redirect::to("/register?error=failed").into_response()
        }
    }
}

// =============================================================================
// Email Verification Routes
// =============================================================================

/// Handle the verification link from the email.
pub async fn verify_email(
    State(state): State<AppState>,
    session: Session,
    ctx: AuthContext,
    Query(query): Query<VerifyQuery>,
) -> Response {
    let Ok(token) = Uuid::parse_str(&query.token) else {
        return Redirect::to("/login?error=invalid_token").into_response();
    };

    match state.auth().verify_email(token).await {
        Ok(user) => {
            // Refresh the session snapshot when the verified account is
            // the one currently signed in.
            if ctx.user().is_some_and(|current| current.id == user.id) {
                if let Err(e) = set_current_user(&session, &CurrentUser::from(&user)).await {
                    tracing::error!("Failed to refresh session after verification: {e}");
                }
                return Redirect::to("/dashboard?success=verified").into_response();
            }
            Redirect::to("/login?success=verified").into_response()
        }
        Err(e) => {
            tracing::warn!("Email verification failed: {e}");
            Redirect::to("/login?error=invalid_token").into_response()
        }
    }
}

/// Resend the verification email for the signed-in user.
pub async fn resend_verification(State(state): State<AppState>, ctx: AuthContext) -> Response {
    match state.auth().resend_verification_email(&ctx).await {
        Ok(()) => Redirect::to("/dashboard?success=verification_sent").into_response(),
        Err(AuthError::Access(_)) => Redirect::to("/login").into_response(),
        Err(e) => {
            tracing::error!("Failed to resend verification email: {e}");
            Redirect::to("/dashboard?error=verification_failed").into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Publishes the sign-out event, then clears and destroys the session.
pub async fn logout(State(state): State<AppState>, ctx: AuthContext, session: Session) -> Response {
    state.auth().sign_out(&ctx);

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_messages_are_distinct() {
        let generic = login_error_message("credentials");
        let unverified = login_error_message("unverified-email");
        assert_ne!(generic, unverified);
        assert!(unverified.contains("not verified"));
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        assert!(!login_error_message("???").is_empty());
        assert!(!register_error_message("???").is_empty());
    }
}
