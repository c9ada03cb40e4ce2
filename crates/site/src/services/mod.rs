//! Business services composing the persistence capabilities.
//!
//! Services take an explicit [`AuthContext`] instead of reading ambient
//! auth state, and mutating operations perform their own capability check
//! at this boundary - the route guards are a UX convenience, not the gate.

pub mod auth;
pub mod blog;
pub mod catalog;
pub mod email;
pub mod topics;

pub use auth::{AuthError, AuthEvent, AuthEvents, AuthService};
pub use blog::{BlogError, BlogService};
pub use catalog::{CatalogError, CatalogService};
pub use email::{MailError, Mailer, SmtpMailer};
pub use topics::{TopicError, TopicModel, TopicService};

use thiserror::Error;

use crate::models::CurrentUser;

/// Errors raised by capability checks at the service boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// No user is signed in.
    #[error("authentication required")]
    Unauthenticated,

    /// The signed-in user lacks the required capability.
    #[error("admin access required")]
    Forbidden,
}

/// Explicit per-request authentication context.
///
/// Built by the session extractor and passed down the call graph; nothing
/// in the services reads global state to find out who is calling.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    user: Option<CurrentUser>,
}

impl AuthContext {
    /// Context for an unauthenticated request.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None }
    }

    /// Context for a signed-in user.
    #[must_use]
    pub const fn for_user(user: CurrentUser) -> Self {
        Self { user: Some(user) }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Require any signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Unauthenticated`] for anonymous contexts.
    pub fn require_user(&self) -> Result<&CurrentUser, AccessError> {
        self.user().ok_or(AccessError::Unauthenticated)
    }

    /// Require a signed-in admin.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Unauthenticated`] for anonymous contexts and
    /// [`AccessError::Forbidden`] for non-admin users.
    pub fn require_admin(&self) -> Result<&CurrentUser, AccessError> {
        let user = self.require_user()?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(AccessError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terry_store_core::{Role, UserId};

    fn current_user(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            name: "Terry".to_owned(),
            email: "terry@example.com".to_owned(),
            role,
            email_verified: true,
        }
    }

    #[test]
    fn test_anonymous_context_has_no_capabilities() {
        let ctx = AuthContext::anonymous();
        assert!(ctx.user().is_none());
        assert_eq!(ctx.require_user(), Err(AccessError::Unauthenticated));
        assert_eq!(ctx.require_admin(), Err(AccessError::Unauthenticated));
    }

    #[test]
    fn test_user_context_is_not_admin() {
        let ctx = AuthContext::for_user(current_user(Role::User));
        assert!(ctx.require_user().is_ok());
        assert_eq!(ctx.require_admin(), Err(AccessError::Forbidden));
    }

    #[test]
    fn test_admin_context_has_admin_capability() {
        let ctx = AuthContext::for_user(current_user(Role::Admin));
        assert!(ctx.require_admin().is_ok());
    }
}
