//! Shared helpers for Terry Store integration tests.
//!
//! The services are exercised against the in-memory capability
//! implementations: [`MemoryStore`] for persistence, [`RecordingMailer`]
//! for outbound mail, and scripted topic models defined per test file.

use std::sync::Mutex;

use async_trait::async_trait;

use terry_store_core::{Role, UserId};
use terry_store_site::models::CurrentUser;
use terry_store_site::services::email::{MailError, Mailer};
use terry_store_site::services::AuthContext;

/// Base URL used by test auth services.
pub const TEST_BASE_URL: &str = "https://store.test";

/// A captured outbound email.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub name: String,
    pub verify_url: String,
}

/// Mailer that records every send instead of talking SMTP.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured messages, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().expect("mailer poisoned").clone()
    }

    /// The most recently captured verification URL.
    #[must_use]
    pub fn last_verify_url(&self) -> Option<String> {
        self.sent().last().map(|mail| mail.verify_url.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification_link(
        &self,
        to: &str,
        name: &str,
        verify_url: &str,
    ) -> Result<(), MailError> {
        self.sent.lock().expect("mailer poisoned").push(SentMail {
            to: to.to_owned(),
            name: name.to_owned(),
            verify_url: verify_url.to_owned(),
        });
        Ok(())
    }
}

/// Extract the `token` query value from a verification URL.
#[must_use]
pub fn token_from_url(url: &str) -> Option<uuid::Uuid> {
    let (_, token) = url.split_once("token=")?;
    uuid::Uuid::parse_str(token).ok()
}

/// Auth context for an admin session.
#[must_use]
pub fn admin_ctx() -> AuthContext {
    AuthContext::for_user(CurrentUser {
        id: UserId::new(900),
        name: "Store Admin".to_owned(),
        email: "admin@store.test".to_owned(),
        role: Role::Admin,
        email_verified: true,
    })
}

/// Auth context for a regular (non-admin) session.
#[must_use]
pub fn user_ctx() -> AuthContext {
    AuthContext::for_user(CurrentUser {
        id: UserId::new(901),
        name: "Visitor".to_owned(),
        email: "visitor@store.test".to_owned(),
        role: Role::User,
        email_verified: true,
    })
}
