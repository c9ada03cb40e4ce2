//! User domain types.
//!
//! These types represent validated domain objects separate from database
//! row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use terry_store_core::{Email, Role, UserId};

/// A site user (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name (defaults to "Anonymous" when none was provided).
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Permission tier; every account starts as `user`.
    pub role: Role,
    /// Whether the email has been verified.
    pub email_verified: bool,
    /// When the user record was created.
    pub created_at: DateTime<Utc>,
    /// When the user record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The signed-in user as carried by the session cookie.
///
/// A snapshot taken at sign-in; role lookups happen against this snapshot
/// for the lifetime of the session. A role change takes effect at the
/// next sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub email_verified: bool,
}

impl CurrentUser {
    /// Whether this session belongs to an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.as_str().to_owned(),
            role: user.role,
            email_verified: user.email_verified,
        }
    }
}
