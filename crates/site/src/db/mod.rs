//! Data access for the site.
//!
//! The document store is an external capability: the rest of the crate
//! only sees the [`ProductStore`], [`ArticleStore`] and [`UserStore`]
//! traits. Production uses the `PostgreSQL` implementations in
//! [`products`], [`articles`] and [`users`]; tests (and seeding dry runs)
//! use the [`memory`] implementation.
//!
//! # Tables
//!
//! - `users` - site accounts (role, verification state, optional password)
//! - `email_verification_tokens` - one-shot verification links
//! - `counters` - the `products` row holds the last-issued product id
//! - `products` - catalog items keyed by counter-assigned id
//! - `articles` - blog submissions keyed by generated UUID
//! - tower-sessions storage (created by its own migration)
//!
//! # Migrations
//!
//! Migrations live in `crates/site/migrations/` and run via:
//! ```bash
//! cargo run -p terry-store-cli -- migrate
//! ```

pub mod articles;
pub mod memory;
pub mod products;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use uuid::Uuid;

use terry_store_core::{
    Article, ArticleId, ArticleStatus, Email, NewArticle, NewProduct, Product, ProductId, Role,
    UserId,
};

pub use articles::PgArticleStore;
pub use memory::MemoryStore;
pub use products::PgProductStore;
pub use users::PgUserStore;

use crate::models::user::User;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// A new user record, written exactly once per account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    /// Absent for accounts created through Google sign-in.
    pub password_hash: Option<String>,
    pub email_verified: bool,
}

/// Product persistence capability.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Allocate the next product ID from the counter document.
    ///
    /// Runs as a single transaction: an absent counter is initialized to 1
    /// and 1 is returned; otherwise the counter is atomically incremented
    /// and the new value returned. Concurrent callers never observe the
    /// same id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` when the transaction cannot
    /// commit; the caller must abort product creation.
    async fn allocate_next_id(&self) -> Result<ProductId, RepositoryError>;

    /// Write a product under a previously allocated id with server-assigned
    /// timestamps.
    async fn insert(&self, id: ProductId, new: &NewProduct) -> Result<Product, RepositoryError>;

    /// List products ordered by creation time descending, optionally capped.
    async fn list(&self, limit: Option<i64>) -> Result<Vec<Product>, RepositoryError>;
}

/// Article persistence capability.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Write a new article under a freshly generated id.
    ///
    /// The stored status is always [`ArticleStatus::Review`]; existing
    /// articles are never updated by this operation.
    async fn insert(&self, new: &NewArticle) -> Result<Article, RepositoryError>;

    /// List all articles ordered by creation time descending.
    async fn list(&self) -> Result<Vec<Article>, RepositoryError>;

    /// Unconditionally overwrite an article's status and update timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no article has this id.
    async fn set_status(
        &self,
        id: ArticleId,
        status: ArticleStatus,
    ) -> Result<(), RepositoryError>;
}

/// User-record persistence capability.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Create a user record. Fails with `Conflict` when the email is taken;
    /// existing records are never overwritten.
    async fn create(&self, new: &NewUser) -> Result<User, RepositoryError>;

    /// Fetch a user together with their password hash, or `None` when the
    /// user doesn't exist or has no password set (Google-only account).
    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    async fn mark_email_verified(&self, id: UserId) -> Result<(), RepositoryError>;

    async fn set_role(&self, id: UserId, role: Role) -> Result<(), RepositoryError>;

    /// Store a one-shot verification token for a user.
    async fn create_verification_token(
        &self,
        user_id: UserId,
        token: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// Consume a verification token, returning the owning user when the
    /// token exists and has not expired. Tokens are single-use.
    async fn consume_verification_token(
        &self,
        token: Uuid,
    ) -> Result<Option<UserId>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
