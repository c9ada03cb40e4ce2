//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::AccessError;
use crate::services::email::MailError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] terry_store_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Credentials were valid but the account's email is unverified.
    ///
    /// Distinguished from [`AuthError::InvalidCredentials`] so the sign-in
    /// flow can end the session and tell the user to verify, rather than
    /// reporting a generic failure.
    #[error("unverified-email")]
    UnverifiedEmail,

    /// The verification token is unknown, expired, or already used.
    #[error("invalid or expired verification token")]
    InvalidVerificationToken,

    /// Capability check failed (e.g. resend without an active session).
    #[error("access denied: {0}")]
    Access(#[from] AccessError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Verification email could not be sent.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
