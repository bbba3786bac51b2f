//! Order models.
//!
//! Orders are submitted manually from the cart page: the customer fills in
//! their contact details and the storefront records the order and notifies
//! the shop over WhatsApp. There is no payment processing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ramadhane_core::{OrderId, Price, ProductId};

/// One purchased line of an order, as submitted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    /// Unit price at the time the item was added to the cart.
    pub price: Price,
}

/// An order submission, before it has been assigned an ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_name: String,
    pub phone_number: String,
    pub address: String,
    pub total_amount: Price,
    pub items: Vec<OrderItemInput>,
}

/// A recorded order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub phone_number: String,
    pub address: String,
    pub total_amount: Price,
    pub items: Vec<OrderItemInput>,
    pub created_at: DateTime<Utc>,
}
