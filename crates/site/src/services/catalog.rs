//! Product catalog service.

use std::sync::Arc;

use thiserror::Error;

use terry_store_core::{NewProduct, Product};

use super::{AccessError, AuthContext};
use crate::db::{ProductStore, RepositoryError};

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Caller lacks the required capability.
    #[error("access denied: {0}")]
    Access(#[from] AccessError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Product catalog service.
pub struct CatalogService {
    products: Arc<dyn ProductStore>,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// Upload a validated product.
    ///
    /// Allocates the next product id, then writes the product under it.
    /// When allocation fails the request is aborted - no partial product
    /// is ever written.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Access` unless the caller is an admin, and
    /// `CatalogError::Repository` when allocation or the write fails.
    pub async fn create_product(
        &self,
        ctx: &AuthContext,
        new: &NewProduct,
    ) -> Result<Product, CatalogError> {
        ctx.require_admin()?;

        let id = self.products.allocate_next_id().await?;
        let product = self.products.insert(id, new).await?;

        tracing::info!(product_id = %product.id, title = %product.title, "Product uploaded");
        Ok(product)
    }

    /// List products for display, newest first, optionally capped.
    ///
    /// Degrades to an empty list on read failure (the error is logged) and
    /// silently drops records that are missing display fields - malformed
    /// data is treated as absent, not fatal.
    pub async fn list_products(&self, limit: Option<usize>) -> Vec<Product> {
        let limit = limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX));
        match self.products.list(limit).await {
            Ok(products) => products
                .into_iter()
                .filter(|product| {
                    if product.is_displayable() {
                        true
                    } else {
                        tracing::warn!(product_id = %product.id, "Skipping malformed product record");
                        false
                    }
                })
                .collect(),
            Err(e) => {
                tracing::error!("Failed to fetch products: {e}");
                Vec::new()
            }
        }
    }
}
