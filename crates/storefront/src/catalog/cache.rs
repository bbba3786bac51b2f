//! Catalog response caching.
//!
//! Wraps any [`CatalogStore`] with a short-TTL moka cache so repeated
//! identical queries (the common case while a visitor toggles filters back
//! and forth) don't hit the database every time. Because the resolver is
//! deterministic, the normalized [`CatalogQuery`] is a sound cache key.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use ramadhane_core::ProductId;

use super::store::{CatalogError, CatalogStore};
use super::CatalogQuery;
use crate::models::product::Product;

/// Maximum cached entries per cache.
const MAX_ENTRIES: u64 = 1024;

/// How long a cached response stays fresh.
const TTL: Duration = Duration::from_secs(60);

/// A [`CatalogStore`] with response caching.
pub struct CachedCatalog<S> {
    inner: S,
    lists: Cache<CatalogQuery, Arc<Vec<Product>>>,
    products: Cache<ProductId, Arc<Product>>,
}

impl<S: CatalogStore> CachedCatalog<S> {
    /// Wrap `inner` with list and product caches.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            lists: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(TTL)
                .build(),
            products: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(TTL)
                .build(),
        }
    }
}

#[async_trait]
impl<S: CatalogStore> CatalogStore for CachedCatalog<S> {
    async fn list(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        if let Some(hit) = self.lists.get(query).await {
            return Ok((*hit).clone());
        }

        let fresh = self.inner.list(query).await?;
        self.lists
            .insert(query.clone(), Arc::new(fresh.clone()))
            .await;
        Ok(fresh)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        if let Some(hit) = self.products.get(&id).await {
            return Ok(Some((*hit).clone()));
        }

        let fresh = self.inner.get(id).await?;
        if let Some(product) = &fresh {
            self.products.insert(id, Arc::new(product.clone())).await;
        }
        Ok(fresh)
    }
}
