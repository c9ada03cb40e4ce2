//! Article repository backed by `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use terry_store_core::{Article, ArticleId, ArticleStatus, NewArticle};

use super::{ArticleStore, RepositoryError};

/// Internal row type for `PostgreSQL` article queries.
#[derive(Debug, sqlx::FromRow)]
struct ArticleRow {
    id: Uuid,
    title: String,
    author: String,
    short_description: String,
    link: String,
    published_on: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ArticleRow> for Article {
    type Error = RepositoryError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let status: ArticleStatus = row.status.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid status in database: {}", row.status))
        })?;

        Ok(Self {
            id: ArticleId::new(row.id),
            title: row.title,
            author: row.author,
            short_description: row.short_description,
            link: row.link,
            published_on: row.published_on,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for article database operations.
#[derive(Clone)]
pub struct PgArticleStore {
    pool: PgPool,
}

impl PgArticleStore {
    /// Create a new article repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn insert(&self, new: &NewArticle) -> Result<Article, RepositoryError> {
        let id = ArticleId::generate();

        // Status is stamped here, not taken from the caller: submissions
        // always enter moderation as "review".
        let row = sqlx::query_as::<_, ArticleRow>(
            r"
            INSERT INTO articles (id, title, author, short_description, link, published_on, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, author, short_description, link, published_on, status,
                      created_at, updated_at
            ",
        )
        .bind(id.as_uuid())
        .bind(&new.title)
        .bind(&new.author)
        .bind(&new.short_description)
        .bind(&new.link)
        .bind(new.published_on)
        .bind(ArticleStatus::Review.to_string())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list(&self) -> Result<Vec<Article>, RepositoryError> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            r"
            SELECT id, title, author, short_description, link, published_on, status,
                   created_at, updated_at
            FROM articles
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn set_status(
        &self,
        id: ArticleId,
        status: ArticleStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE articles
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            ",
        )
        .bind(status.to_string())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
