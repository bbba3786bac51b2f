//! The catalog store seam.

use async_trait::async_trait;
use thiserror::Error;

use ramadhane_core::ProductId;

use super::CatalogQuery;
use crate::models::product::Product;

/// A catalog store failure.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing database rejected or failed the query.
    #[error("catalog query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Executes normalized catalog queries.
///
/// The resolver only shapes [`CatalogQuery`] objects; implementations decide
/// how to satisfy them. The returned list is already ordered and is rendered
/// unmodified by callers.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// List products matching `query`, in the query's ordering.
    async fn list(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError>;

    /// Fetch a single product by id.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, CatalogError>;
}
