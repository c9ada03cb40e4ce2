//! Session storage keys.

/// Keys under which values are stored in the tower-sessions session.
pub mod session_keys {
    /// The signed-in user snapshot ([`crate::models::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";

    /// CSRF state for the in-flight Google OAuth round trip.
    pub const OAUTH_STATE: &str = "oauth_state";
}
