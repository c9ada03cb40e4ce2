//! In-memory store implementing the persistence capabilities.
//!
//! This is the test double for the document-store seam: the services are
//! exercised against it in unit and integration tests without a database.
//! It keeps the same contracts as the `PostgreSQL` implementations:
//! counter initialization, review-stamping on article insert, and
//! single-use verification tokens.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use terry_store_core::{
    Article, ArticleId, ArticleStatus, Email, NewArticle, NewProduct, Product, ProductId, Role,
    UserId,
};

use super::{ArticleStore, NewUser, ProductStore, RepositoryError, UserStore};
use crate::models::user::User;

#[derive(Debug, Default)]
struct Inner {
    counter: Option<i32>,
    products: Vec<Product>,
    articles: Vec<Article>,
    users: Vec<StoredUser>,
    next_user_id: i32,
    verification_tokens: HashMap<Uuid, (UserId, DateTime<Utc>)>,
}

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: Option<String>,
}

/// In-memory implementation of all persistence capabilities.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product record verbatim, bypassing allocation and
    /// validation. Lets tests stage malformed or pre-dated records.
    pub fn seed_product(&self, product: Product) {
        self.lock().products.push(product);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store poisoned")
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn allocate_next_id(&self) -> Result<ProductId, RepositoryError> {
        let mut inner = self.lock();
        let next = match inner.counter {
            None => 1,
            Some(current) => current + 1,
        };
        inner.counter = Some(next);
        Ok(ProductId::new(next))
    }

    async fn insert(&self, id: ProductId, new: &NewProduct) -> Result<Product, RepositoryError> {
        let mut inner = self.lock();
        if inner.products.iter().any(|p| p.id == id) {
            return Err(RepositoryError::Conflict(format!(
                "product id {id} already exists"
            )));
        }
        let now = Utc::now();
        let product = Product {
            id,
            title: new.title.clone(),
            link: new.link.clone(),
            image_url: new.image_url.clone(),
            label: new.label,
            bullets: new.bullets.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.products.push(product.clone());
        Ok(product)
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<Product>, RepositoryError> {
        let inner = self.lock();
        // Newest first; insertion order breaks timestamp ties.
        let mut indexed: Vec<(usize, &Product)> = inner.products.iter().enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| {
            b.created_at.cmp(&a.created_at).then(ib.cmp(ia))
        });
        let mut products: Vec<Product> = indexed.into_iter().map(|(_, p)| p.clone()).collect();
        if let Some(limit) = limit {
            products.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(products)
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn insert(&self, new: &NewArticle) -> Result<Article, RepositoryError> {
        let now = Utc::now();
        let article = Article {
            id: ArticleId::generate(),
            title: new.title.clone(),
            author: new.author.clone(),
            short_description: new.short_description.clone(),
            link: new.link.clone(),
            published_on: new.published_on,
            status: ArticleStatus::Review,
            created_at: now,
            updated_at: now,
        };
        self.lock().articles.push(article.clone());
        Ok(article)
    }

    async fn list(&self) -> Result<Vec<Article>, RepositoryError> {
        let inner = self.lock();
        let mut indexed: Vec<(usize, &Article)> = inner.articles.iter().enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| {
            b.created_at.cmp(&a.created_at).then(ib.cmp(ia))
        });
        Ok(indexed.into_iter().map(|(_, a)| a.clone()).collect())
    }

    async fn set_status(
        &self,
        id: ArticleId,
        status: ArticleStatus,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        let article = inner
            .articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RepositoryError::NotFound)?;
        article.status = status;
        article.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.user.clone()))
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.user.email == *email)
            .map(|u| u.user.clone()))
    }

    async fn create(&self, new: &NewUser) -> Result<User, RepositoryError> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.user.email == new.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        inner.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: UserId::new(inner.next_user_id),
            name: new.name.clone(),
            email: new.email.clone(),
            role: Role::default(),
            email_verified: new.email_verified,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(StoredUser {
            user: user.clone(),
            password_hash: new.password_hash.clone(),
        });
        Ok(user)
    }

    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self.lock().users.iter().find_map(|u| {
            if u.user.email == *email {
                u.password_hash
                    .clone()
                    .map(|hash| (u.user.clone(), hash))
            } else {
                None
            }
        }))
    }

    async fn mark_email_verified(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        let stored = inner
            .users
            .iter_mut()
            .find(|u| u.user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        stored.user.email_verified = true;
        stored.user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_role(&self, id: UserId, role: Role) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        let stored = inner
            .users
            .iter_mut()
            .find(|u| u.user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        stored.user.role = role;
        stored.user.updated_at = Utc::now();
        Ok(())
    }

    async fn create_verification_token(
        &self,
        user_id: UserId,
        token: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .verification_tokens
            .insert(token, (user_id, expires_at));
        Ok(())
    }

    async fn consume_verification_token(
        &self,
        token: Uuid,
    ) -> Result<Option<UserId>, RepositoryError> {
        let mut inner = self.lock();
        match inner.verification_tokens.remove(&token) {
            Some((user_id, expires_at)) if expires_at > Utc::now() => Ok(Some(user_id)),
            _ => Ok(None),
        }
    }
}
