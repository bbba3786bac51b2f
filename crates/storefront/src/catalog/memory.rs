//! In-memory catalog store.
//!
//! Implements the full query semantics over a fixed product list: used by the
//! integration tests and anywhere a catalog is needed without Postgres.

use std::cmp::Ordering;

use async_trait::async_trait;

use ramadhane_core::ProductId;

use super::store::{CatalogError, CatalogStore};
use super::{CatalogQuery, Sort};
use crate::models::product::Product;

/// A catalog backed by a fixed in-memory product list.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: Vec<Product>,
}

impl MemoryCatalog {
    /// Create a catalog over the given products.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn list(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        let mut matches: Vec<Product> = self
            .products
            .iter()
            .filter(|product| matches_query(product, query))
            .cloned()
            .collect();

        matches.sort_by(|a, b| compare(a, b, query.sort));
        Ok(matches)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }
}

/// Whether `product` satisfies every constraint in `query`.
///
/// Query strings are already lower-cased by the resolver; catalog values are
/// compared case-insensitively.
fn matches_query(product: &Product, query: &CatalogQuery) -> bool {
    if let Some(category) = query.category.as_deref() {
        if !product.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }

    if let Some(collaborator) = query.collaborator.as_deref() {
        let matched = product
            .collaborator
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(collaborator));
        if !matched {
            return false;
        }
    }

    if let Some(size) = query.size.as_deref() {
        if !product.sizes.iter().any(|s| s.eq_ignore_ascii_case(size)) {
            return false;
        }
    }

    if let Some(color) = query.color.as_deref() {
        if !product.colors.iter().any(|c| c.eq_ignore_ascii_case(color)) {
            return false;
        }
    }

    if let Some(needle) = query.name_contains.as_deref() {
        if !product
            .name
            .to_lowercase()
            .contains(&needle.to_lowercase())
        {
            return false;
        }
    }

    true
}

/// Ordering for a sort key, with ascending id as the tie break everywhere so
/// equal inputs always list in the same order.
fn compare(a: &Product, b: &Product, sort: Sort) -> Ordering {
    let primary = match sort {
        Sort::Featured => Ordering::Equal,
        Sort::Newest => b.created_at.cmp(&a.created_at),
        Sort::PriceAsc => a.price.cmp(&b.price),
        Sort::PriceDesc => b.price.cmp(&a.price),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}
