//! Order submission handler.
//!
//! Recording the order and notifying the shop are deliberately decoupled: the
//! order is committed first, and a WhatsApp delivery failure is logged rather
//! than failing a purchase that already exists.

use std::collections::HashMap;

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use ramadhane_core::{OrderId, Price, ProductId};

use crate::cart::Cart;
use crate::error::{AppError, Result};
use crate::models::order::NewOrder;
use crate::models::session_keys;
use crate::services::whatsapp::format_order_message;
use crate::state::AppState;

/// Order confirmation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub total_amount: Price,
}

/// Submit an order.
///
/// Validates the submission, records it, sends the best-effort WhatsApp
/// notification, and clears the session cart.
#[instrument(skip(state, session, order), fields(items = order.items.len()))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(order): Json<NewOrder>,
) -> Result<Json<OrderConfirmation>> {
    if order.items.is_empty() {
        return Err(AppError::BadRequest("Order has no items".to_string()));
    }
    if order.customer_name.trim().is_empty() {
        return Err(AppError::Validation("Please enter your name".to_string()));
    }
    if order.phone_number.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter a phone number".to_string(),
        ));
    }
    if order.address.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter a delivery address".to_string(),
        ));
    }

    let recorded = state.orders().create(order).await?;
    tracing::info!(order_id = %recorded.id, total = %recorded.total_amount, "Order recorded");

    notify_shop(&state, &recorded).await;

    // The purchase is complete; the session cart is done.
    if let Err(e) = session.remove::<Cart>(session_keys::CART).await {
        tracing::warn!(error = %e, "Failed to clear session cart after order");
    }

    Ok(Json(OrderConfirmation {
        order_id: recorded.id,
        total_amount: recorded.total_amount,
    }))
}

/// Send the order announcement, logging instead of failing.
async fn notify_shop(state: &AppState, order: &crate::models::order::Order) {
    let Some(whatsapp) = state.whatsapp() else {
        tracing::info!("WhatsApp notifications disabled, skipping order announcement");
        return;
    };

    // Resolve product names for the message; a product deleted since the
    // add-to-cart still gets a line under its id.
    let mut names: HashMap<ProductId, String> = HashMap::new();
    for item in &order.items {
        if names.contains_key(&item.product_id) {
            continue;
        }
        let name = match state.catalog().get(item.product_id).await {
            Ok(Some(product)) => product.name,
            Ok(None) => format!("Product {}", item.product_id),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to look up product name for order message");
                format!("Product {}", item.product_id)
            }
        };
        names.insert(item.product_id, name);
    }

    let message = format_order_message(order, |id| {
        names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Product {id}"))
    });

    if let Err(e) = whatsapp.notify_order(&message).await {
        tracing::warn!(error = %e, order_id = %order.id, "Failed to send order notification");
    }
}
