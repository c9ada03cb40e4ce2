//! Authentication service.
//!
//! Wraps the user-record store with sign-up, sign-in, Google sign-in, and
//! email verification. The one non-trivial branch in the system lives
//! here: password sign-in against an unverified account fails with the
//! distinguished [`AuthError::UnverifiedEmail`] condition so the caller
//! can end the session and explain, instead of showing a generic error.

mod error;
mod events;
pub mod google;

pub use error::AuthError;
pub use events::{AuthEvent, AuthEvents};

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use terry_store_core::Email;

use super::AuthContext;
use crate::db::{NewUser, RepositoryError, UserStore};
use crate::models::user::User;
use crate::services::email::Mailer;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// How long a verification link stays valid.
const VERIFICATION_TOKEN_TTL_HOURS: i64 = 48;

/// Display name used when an account was created without one.
const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

/// Authentication service.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    events: AuthEvents,
    base_url: String,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        events: AuthEvents,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            mailer,
            events,
            base_url: base_url.into(),
        }
    }

    // =========================================================================
    // Sign-up
    // =========================================================================

    /// Register a new account with email and password.
    ///
    /// Creates the user record exactly once (default role `user`), sends
    /// the verification email, and returns the user - the caller keeps the
    /// session open, since verification is informational until the next
    /// password sign-in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let name = normalize_name(name);
        let user = self
            .users
            .create(&NewUser {
                name,
                email,
                password_hash: Some(password_hash),
                email_verified: false,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        self.issue_verification(&user).await?;
        self.events.publish(AuthEvent::SignedUp { user_id: user.id });

        Ok(user)
    }

    // =========================================================================
    // Sign-in
    // =========================================================================

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::UnverifiedEmail` when the password checks out but
    /// the account's email is unverified; the caller must not keep a session
    /// for this user.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !user.email_verified {
            return Err(AuthError::UnverifiedEmail);
        }

        self.events.publish(AuthEvent::SignedIn { user_id: user.id });
        Ok(user)
    }

    /// Sign in (or up) with a Google-asserted identity.
    ///
    /// The user record is created on first sign-in and never overwritten
    /// afterwards; the stored name and role stay whatever they already
    /// were.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if Google handed us a bad email.
    pub async fn sign_in_with_google(
        &self,
        name: Option<&str>,
        email: &str,
        email_verified: bool,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        if let Some(existing) = self.users.get_by_email(&email).await? {
            self.events
                .publish(AuthEvent::SignedIn { user_id: existing.id });
            return Ok(existing);
        }

        let created = self
            .users
            .create(&NewUser {
                name: normalize_name(name.unwrap_or_default()),
                email: email.clone(),
                password_hash: None,
                email_verified,
            })
            .await;

        let user = match created {
            Ok(user) => {
                self.events.publish(AuthEvent::SignedUp { user_id: user.id });
                user
            }
            // Lost a race against a concurrent first sign-in; the record
            // exists now, which is all we need.
            Err(RepositoryError::Conflict(_)) => self
                .users
                .get_by_email(&email)
                .await?
                .ok_or(AuthError::UserNotFound)?,
            Err(other) => return Err(AuthError::Repository(other)),
        };

        Ok(user)
    }

    /// Record a sign-out for the session's user.
    pub fn sign_out(&self, ctx: &AuthContext) {
        if let Some(user) = ctx.user() {
            self.events.publish(AuthEvent::SignedOut { user_id: user.id });
        }
    }

    // =========================================================================
    // Email verification
    // =========================================================================

    /// Resend the verification email for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Access` when no session is active, and
    /// `AuthError::UserNotFound` when the session points at a deleted
    /// account. Sending to an already-verified account is a no-op.
    pub async fn resend_verification_email(&self, ctx: &AuthContext) -> Result<(), AuthError> {
        let current = ctx.require_user()?;

        let user = self
            .users
            .get_by_id(current.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.email_verified {
            return Ok(());
        }

        self.issue_verification(&user).await
    }

    /// Redeem a verification token and mark the account verified.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidVerificationToken` for unknown, expired,
    /// or already-used tokens.
    pub async fn verify_email(&self, token: Uuid) -> Result<User, AuthError> {
        let user_id = self
            .users
            .consume_verification_token(token)
            .await?
            .ok_or(AuthError::InvalidVerificationToken)?;

        self.users.mark_email_verified(user_id).await?;

        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.events.publish(AuthEvent::EmailVerified { user_id });
        Ok(user)
    }

    /// Store a fresh token and send the verification link.
    async fn issue_verification(&self, user: &User) -> Result<(), AuthError> {
        let token = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS);

        self.users
            .create_verification_token(user.id, token, expires_at)
            .await?;

        let verify_url = format!(
            "{}/auth/verify?token={token}",
            self.base_url.trim_end_matches('/')
        );
        self.mailer
            .send_verification_link(user.email.as_str(), &user.name, &verify_url)
            .await?;

        Ok(())
    }
}

/// Trim a display name, falling back to the default when empty.
fn normalize_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        DEFAULT_DISPLAY_NAME.to_owned()
    } else {
        name.to_owned()
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
