//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::db::{
    ArticleStore, PgArticleStore, PgProductStore, PgUserStore, ProductStore, UserStore,
};
use crate::gemini::GeminiClient;
use crate::services::auth::google::GoogleOAuth;
use crate::services::{
    AuthEvents, AuthService, BlogService, CatalogService, Mailer, SmtpMailer, TopicModel,
    TopicService,
};

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("SMTP configuration error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the connection pool, and the
/// capability implementations the services run against.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    products: Arc<dyn ProductStore>,
    articles: Arc<dyn ArticleStore>,
    users: Arc<dyn UserStore>,
    topics: Arc<dyn TopicModel>,
    mailer: Arc<dyn Mailer>,
    auth_events: AuthEvents,
    google: Option<GoogleOAuth>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be configured.
    pub fn new(config: SiteConfig, pool: PgPool) -> Result<Self, StateError> {
        let products: Arc<dyn ProductStore> = Arc::new(PgProductStore::new(pool.clone()));
        let articles: Arc<dyn ArticleStore> = Arc::new(PgArticleStore::new(pool.clone()));
        let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
        let topics: Arc<dyn TopicModel> = Arc::new(GeminiClient::new(&config.gemini));
        let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(&config.email)?);
        let google = config
            .google
            .as_ref()
            .map(|google| GoogleOAuth::new(google, &config.base_url));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                products,
                articles,
                users,
                topics,
                mailer,
                auth_events: AuthEvents::new(),
                google,
            }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a handle to the auth event channel.
    #[must_use]
    pub fn auth_events(&self) -> &AuthEvents {
        &self.inner.auth_events
    }

    /// Get the Google OAuth client, when configured.
    #[must_use]
    pub fn google(&self) -> Option<&GoogleOAuth> {
        self.inner.google.as_ref()
    }

    /// Build the catalog service.
    #[must_use]
    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(Arc::clone(&self.inner.products))
    }

    /// Build the blog service.
    #[must_use]
    pub fn blog(&self) -> BlogService {
        BlogService::new(Arc::clone(&self.inner.articles))
    }

    /// Build the topic-suggestion service.
    #[must_use]
    pub fn topics(&self) -> TopicService {
        TopicService::new(Arc::clone(&self.inner.topics))
    }

    /// Build the auth service.
    #[must_use]
    pub fn auth(&self) -> AuthService {
        AuthService::new(
            Arc::clone(&self.inner.users),
            Arc::clone(&self.inner.mailer),
            self.inner.auth_events.clone(),
            self.inner.config.base_url.clone(),
        )
    }
}
