//! Cart route handlers.
//!
//! The visitor's cart lives in their session: each handler loads the cart,
//! applies one cart-engine operation, and writes it back. Session writes are
//! best-effort: a failed write is logged and the response still reflects the
//! mutated cart.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use ramadhane_core::{Price, ProductId};

use crate::cart::{Cart, LineItem, LineKey};
use crate::error::{AppError, Result};
use crate::models::product::Product;
use crate::models::session_keys;
use crate::state::AppState;

/// Cart response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub total_items: u32,
    pub total_price: Price,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

/// Cart count response body.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: i32,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
}

/// Quantity update request. The quantity is absolute and clamped to 1.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub product_id: i32,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: u32,
}

/// Remove-line request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub product_id: i32,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the session cart, treating a missing or unreadable one as empty.
async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read session cart, starting empty");
            Cart::new()
        }
    }
}

/// Persist the cart to the session.
///
/// A failed write is logged, not surfaced: the mutation already happened and
/// the response reflects it.
async fn save_cart(session: &Session, cart: &Cart) {
    if let Err(e) = session.insert(session_keys::CART, cart).await {
        tracing::warn!(error = %e, "Failed to persist session cart");
    }
}

/// Validate a variant selection against the axes the product defines.
fn validate_selection(product: &Product, size: &str, color: &str) -> Result<()> {
    if product.requires_size() {
        if size.is_empty() {
            return Err(AppError::Validation("Please select a size".to_string()));
        }
        if !product.sizes.iter().any(|s| s.eq_ignore_ascii_case(size)) {
            return Err(AppError::Validation(format!(
                "Size {size} is not available for {}",
                product.name
            )));
        }
    }

    if product.requires_color() {
        if color.is_empty() {
            return Err(AppError::Validation("Please select a color".to_string()));
        }
        if !product.colors.iter().any(|c| c.eq_ignore_ascii_case(color)) {
            return Err(AppError::Validation(format!(
                "Color {color} is not available for {}",
                product.name
            )));
        }
    }

    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Current cart with derived totals.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    let cart = load_cart(&session).await;
    Json(CartView::from(&cart))
}

/// Add one unit of a product configuration to the cart.
///
/// Repeated calls for the same `(product, size, color)` increment the
/// existing line by one unit each.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .get(ProductId::new(req.product_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", req.product_id)))?;

    validate_selection(&product, &req.size, &req.color)?;

    let mut cart = load_cart(&session).await;
    cart.add(&product, req.size, req.color);
    save_cart(&session, &cart).await;

    Ok(Json(CartView::from(&cart)))
}

/// Set a cart line's quantity (absolute, clamped to a minimum of 1).
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(req): Json<UpdateQuantityRequest>,
) -> Json<CartView> {
    let mut cart = load_cart(&session).await;
    let key = LineKey::new(ProductId::new(req.product_id), req.size, req.color);
    cart.set_quantity(&key, req.quantity);
    save_cart(&session, &cart).await;

    Json(CartView::from(&cart))
}

/// Remove a cart line. Removing an absent line is a no-op.
#[instrument(skip(session))]
pub async fn remove(session: Session, Json(req): Json<RemoveItemRequest>) -> Json<CartView> {
    let mut cart = load_cart(&session).await;
    let key = LineKey::new(ProductId::new(req.product_id), req.size, req.color);
    cart.remove(&key);
    save_cart(&session, &cart).await;

    Json(CartView::from(&cart))
}

/// Clear the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Json<CartView> {
    if let Err(e) = session.remove::<Cart>(session_keys::CART).await {
        tracing::warn!(error = %e, "Failed to clear session cart");
    }
    Json(CartView::from(&Cart::new()))
}

/// Item count for the cart badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCount> {
    let cart = load_cart(&session).await;
    Json(CartCount {
        count: cart.total_items(),
    })
}
