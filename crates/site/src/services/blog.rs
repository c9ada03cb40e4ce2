//! Blog submission and moderation service.

use std::sync::Arc;

use thiserror::Error;

use terry_store_core::{Article, ArticleId, ArticleStatus, NewArticle};

use super::{AccessError, AuthContext};
use crate::db::{ArticleStore, RepositoryError};

/// Errors that can occur during blog operations.
#[derive(Debug, Error)]
pub enum BlogError {
    /// Caller lacks the required capability.
    #[error("access denied: {0}")]
    Access(#[from] AccessError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Blog submission and moderation service.
pub struct BlogService {
    articles: Arc<dyn ArticleStore>,
}

impl BlogService {
    /// Create a new blog service.
    #[must_use]
    pub fn new(articles: Arc<dyn ArticleStore>) -> Self {
        Self { articles }
    }

    /// Submit a validated article for review.
    ///
    /// The stored article always starts in [`ArticleStatus::Review`];
    /// existing articles are never touched by a submission.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Access` unless the caller is an admin, and
    /// `BlogError::Repository` when the write fails.
    pub async fn submit_article(
        &self,
        ctx: &AuthContext,
        new: &NewArticle,
    ) -> Result<Article, BlogError> {
        ctx.require_admin()?;

        let article = self.articles.insert(new).await?;
        tracing::info!(article_id = %article.id, title = %article.title, "Article submitted for review");
        Ok(article)
    }

    /// List articles, newest first, optionally restricted to one status.
    ///
    /// The status filter runs in memory after the full fetch; the store
    /// sees no predicate. Degrades to an empty list on read failure.
    pub async fn list_articles(&self, status: Option<ArticleStatus>) -> Vec<Article> {
        match self.articles.list().await {
            Ok(mut articles) => {
                if let Some(status) = status {
                    articles.retain(|article| article.status == status);
                }
                articles
            }
            Err(e) => {
                tracing::error!("Failed to fetch articles: {e}");
                Vec::new()
            }
        }
    }

    /// Overwrite an article's status.
    ///
    /// No transition rules are enforced: any status may move to any other,
    /// including out of `deleted`. Whether `deleted` ought to be terminal
    /// is an open question; until someone decides, it is not.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::Access` unless the caller is an admin, and
    /// `BlogError::Repository` (`NotFound`) for unknown article ids.
    pub async fn set_status(
        &self,
        ctx: &AuthContext,
        id: ArticleId,
        status: ArticleStatus,
    ) -> Result<(), BlogError> {
        ctx.require_admin()?;

        self.articles.set_status(id, status).await?;
        tracing::info!(article_id = %id, status = %status, "Article status updated");
        Ok(())
    }
}
