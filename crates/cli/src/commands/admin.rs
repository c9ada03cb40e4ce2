//! Role management command.
//!
//! Admin is granted only from this CLI; the web surface never promotes
//! anyone.

use terry_store_core::{Email, Role};
use terry_store_site::db::{PgUserStore, UserStore};

use super::CommandError;

/// Promote an existing account to admin.
///
/// # Errors
///
/// Returns an error when no account exists for the email or the update
/// fails.
pub async fn grant(email: &str) -> Result<(), CommandError> {
    let email = Email::parse(email)?;
    let pool = super::connect().await?;
    let users = PgUserStore::new(pool);

    let user = users
        .get_by_email(&email)
        .await?
        .ok_or_else(|| CommandError::UserNotFound(email.as_str().to_owned()))?;

    users.set_role(user.id, Role::Admin).await?;

    tracing::info!(user_id = %user.id, email = %email, "Granted admin role");
    Ok(())
}
