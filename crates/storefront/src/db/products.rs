//! Postgres-backed catalog store.
//!
//! Executes normalized [`CatalogQuery`] objects against the `products` and
//! `product_images` tables. Filters arrive already lower-cased from the
//! resolver; the SQL compares case-insensitively on its side and every
//! ordering ends in `id ASC` so result order is stable across calls.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder};

use ramadhane_core::{Price, ProductId};

use crate::catalog::store::{CatalogError, CatalogStore};
use crate::catalog::{CatalogQuery, Sort};
use crate::models::product::{Product, ProductImage};

/// Catalog repository over the storefront database.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    /// Create a catalog over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch images for `product_ids`, grouped by product.
    async fn images_for(
        &self,
        product_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<ProductImage>>, sqlx::Error> {
        let rows: Vec<ImageRow> = sqlx::query_as(
            r"
            SELECT product_id, url, is_main
            FROM product_images
            WHERE product_id = ANY($1)
            ORDER BY product_id, position, id
            ",
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<ProductImage>> = HashMap::new();
        for row in rows {
            grouped.entry(row.product_id).or_default().push(ProductImage {
                url: row.url,
                is_main: row.is_main,
            });
        }
        Ok(grouped)
    }

    /// Attach images to product rows, preserving row order.
    async fn hydrate(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, sqlx::Error> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id.as_i32()).collect();
        let mut images = self.images_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let images = images.remove(&row.id.as_i32()).unwrap_or_default();
                row.into_product(images)
            })
            .collect())
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn list(&self, query: &CatalogQuery) -> Result<Vec<Product>, CatalogError> {
        let mut builder = QueryBuilder::new(
            "SELECT id, name, description, price, sale_price, category, collaborator, \
             colors, sizes, created_at FROM products WHERE TRUE",
        );

        if let Some(category) = &query.category {
            builder.push(" AND LOWER(category) = ").push_bind(category);
        }
        if let Some(collaborator) = &query.collaborator {
            builder
                .push(" AND LOWER(collaborator) = ")
                .push_bind(collaborator);
        }
        if let Some(size) = &query.size {
            builder
                .push(" AND LOWER(")
                .push_bind(size)
                .push(") IN (SELECT LOWER(s) FROM UNNEST(sizes) AS s)");
        }
        if let Some(color) = &query.color {
            builder
                .push(" AND LOWER(")
                .push_bind(color)
                .push(") IN (SELECT LOWER(c) FROM UNNEST(colors) AS c)");
        }
        if let Some(needle) = &query.name_contains {
            builder
                .push(" AND name ILIKE ")
                .push_bind(format!("%{}%", escape_like(needle)))
                .push(" ESCAPE '\\'");
        }

        builder.push(match query.sort {
            Sort::Featured => " ORDER BY id ASC",
            Sort::Newest => " ORDER BY created_at DESC, id ASC",
            Sort::PriceAsc => " ORDER BY price ASC, id ASC",
            Sort::PriceDesc => " ORDER BY price DESC, id ASC",
        });

        let rows: Vec<ProductRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(CatalogError::Query)?;

        self.hydrate(rows).await.map_err(CatalogError::Query)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, description, price, sale_price, category, collaborator,
                   colors, sizes, created_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CatalogError::Query)?;

        match row {
            Some(row) => {
                let mut products = self.hydrate(vec![row]).await.map_err(CatalogError::Query)?;
                Ok(products.pop())
            }
            None => Ok(None),
        }
    }
}

/// Raw product row before image hydration.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Decimal,
    sale_price: Option<Decimal>,
    category: String,
    collaborator: Option<String>,
    colors: Vec<String>,
    sizes: Vec<String>,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self, images: Vec<ProductImage>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: Price::new(self.price),
            sale_price: self.sale_price.map(Price::new),
            category: self.category,
            collaborator: self.collaborator,
            colors: self.colors,
            sizes: self.sizes,
            images,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    product_id: i32,
    url: String,
    is_main: bool,
}

/// Escape LIKE metacharacters so the needle matches literally.
///
/// The name-contains phrase is plain substring containment, never a pattern;
/// the SQL side pairs this with `ESCAPE '\'`.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
