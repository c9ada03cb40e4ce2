//! Product repository backed by `PostgreSQL`.
//!
//! Queries use the runtime-checked sqlx API with explicit row types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use terry_store_core::{NewProduct, Product, ProductId, ProductLabel};

use super::{ProductStore, RepositoryError};

/// Counter row name for product ID allocation.
const PRODUCTS_COUNTER: &str = "products";

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    link: String,
    image_url: String,
    label: String,
    bullets: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let label: ProductLabel = row.label.parse().map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid label in database: {}", row.label))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            title: row.title,
            link: row.link,
            image_url: row.image_url,
            label,
            bullets: row.bullets,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for product database operations.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn allocate_next_id(&self) -> Result<ProductId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Upsert keeps the read-increment-write inside one statement, so
        // concurrent allocations serialize on the counter row.
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO counters (name, current_id)
            VALUES ($1, 1)
            ON CONFLICT (name)
            DO UPDATE SET current_id = counters.current_id + 1
            RETURNING current_id
            ",
        )
        .bind(PRODUCTS_COUNTER)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ProductId::new(id))
    }

    async fn insert(&self, id: ProductId, new: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (id, title, link, image_url, label, bullets)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, link, image_url, label, bullets, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(&new.title)
        .bind(&new.link)
        .bind(&new.image_url)
        .bind(new.label.to_string())
        .bind(&new.bullets)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!("product id {id} already exists"));
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<Product>, RepositoryError> {
        // LIMIT NULL means "no limit" in PostgreSQL.
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, title, link, image_url, label, bullets, created_at, updated_at
            FROM products
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
