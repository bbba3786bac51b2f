//! WhatsApp Business API client for order notifications.
//!
//! Submitted orders are announced to the shop's WhatsApp number through the
//! Meta Graph API. Delivery is best-effort: an order that is already recorded
//! must never fail because the notification did not go out.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::json;
use thiserror::Error;

use ramadhane_core::{Price, ProductId};

use crate::config::WhatsAppConfig;
use crate::models::order::Order;

/// Graph API base URL.
const BASE_URL: &str = "https://graph.facebook.com/v17.0";

/// Flat shipping fee shown in the order message for non-empty orders.
fn flat_shipping() -> Price {
    Price::from_minor(1599, 2)
}

/// Errors that can occur when sending WhatsApp messages.
#[derive(Debug, Error)]
pub enum WhatsAppError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Client configuration was rejected.
    #[error("configuration error: {0}")]
    Config(String),
}

/// WhatsApp Business API client.
#[derive(Clone)]
pub struct WhatsAppClient {
    client: reqwest::Client,
    phone_number_id: String,
    order_recipient: String,
}

impl WhatsAppClient {
    /// Create a new WhatsApp API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &WhatsAppConfig) -> Result<Self, WhatsAppError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_token.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| WhatsAppError::Config(format!("invalid API token: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            phone_number_id: config.phone_number_id.clone(),
            order_recipient: config.order_recipient.clone(),
        })
    }

    /// Send a plain text message to a phone number.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects the message.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<(), WhatsAppError> {
        let url = format!("{BASE_URL}/{}/messages", self.phone_number_id);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "messaging_product": "whatsapp",
                "to": to,
                "type": "text",
                "text": { "body": body },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WhatsAppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Announce a recorded order to the shop's configured number.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects the message.
    pub async fn notify_order(&self, message: &str) -> Result<(), WhatsAppError> {
        self.send_text(&self.order_recipient, message).await
    }
}

/// Format the order announcement message.
///
/// `name_of` supplies a display name per product; items whose product has
/// since vanished from the catalog still get a line.
pub fn format_order_message(order: &Order, name_of: impl Fn(ProductId) -> String) -> String {
    let lines: Vec<String> = order
        .items
        .iter()
        .map(|item| {
            format!(
                "{} ({}, {}) - Quantity: {} - Price: {}",
                name_of(item.product_id),
                item.size,
                item.color,
                item.quantity,
                item.price * item.quantity,
            )
        })
        .collect();

    let subtotal: Price = order.items.iter().map(|item| item.price * item.quantity).sum();
    let shipping = if order.items.is_empty() {
        Price::ZERO
    } else {
        flat_shipping()
    };

    let mut message = format!(
        "New Order #{} from {} ({})\nAddress: {}\n\n",
        order.id, order.customer_name, order.phone_number, order.address
    );
    message.push_str(&lines.join("\n"));
    message.push_str(&format!(
        "\n\nSubtotal: {subtotal}\nShipping: {shipping}\nTotal: {}",
        subtotal + shipping
    ));

    message
}
