//! Product route handlers.
//!
//! Thin wrappers: each handler parses filter parameters into a
//! [`FilterSpec`], resolves it to a normalized query, and renders the catalog
//! store's result unmodified.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;

use ramadhane_core::ProductId;

use crate::catalog::{self, FilterParams, FilterSpec};
use crate::error::{AppError, Result};
use crate::models::product::Product;
use crate::state::AppState;

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    /// Human-readable heading for the active filters.
    pub heading: String,
    pub products: Vec<Product>,
}

/// List products matching the request's filter parameters.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<ProductListResponse>> {
    let spec = FilterSpec::from_params(&params);
    let query = catalog::resolve(&spec);

    let products = state.catalog().list(&query).await?;

    Ok(Json(ProductListResponse {
        heading: catalog::page_heading(&spec),
        products,
    }))
}

/// Fetch a single product by id.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    state
        .catalog()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
