//! Integration tests for the Ramadhane storefront.
//!
//! The storefront exposes its catalog and order stores behind traits, so the
//! full router can run here against in-memory implementations: no database,
//! no network. Tests drive the router with `tower::ServiceExt::oneshot` and
//! carry the session cookie between requests by hand.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ramadhane-integration-tests
//! ```

#![allow(clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::{TimeZone, Utc};
use secrecy::SecretString;
use tower_sessions::MemoryStore;

use ramadhane_core::{OrderId, Price, ProductId};
use ramadhane_storefront::catalog::MemoryCatalog;
use ramadhane_storefront::config::StorefrontConfig;
use ramadhane_storefront::db::{OrderStore, RepositoryError};
use ramadhane_storefront::middleware::session::session_layer_with_store;
use ramadhane_storefront::models::order::{NewOrder, Order};
use ramadhane_storefront::models::product::{Product, ProductImage};
use ramadhane_storefront::routes;
use ramadhane_storefront::state::AppState;

/// In-memory order store that records what was submitted.
#[derive(Default)]
pub struct MemoryOrders {
    recorded: Mutex<Vec<Order>>,
}

impl MemoryOrders {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Orders recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn recorded(&self) -> Vec<Order> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderStore for MemoryOrders {
    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let mut recorded = self
            .recorded
            .lock()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let id = i32::try_from(recorded.len())
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?
            + 1;
        let order = Order {
            id: OrderId::new(id),
            customer_name: order.customer_name,
            phone_number: order.phone_number,
            address: order.address,
            total_amount: order.total_amount,
            items: order.items,
            created_at: Utc::now(),
        };
        recorded.push(order.clone());
        Ok(order)
    }

    async fn list_recent(&self) -> Result<Vec<Order>, RepositoryError> {
        let recorded = self
            .recorded
            .lock()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        Ok(recorded.iter().rev().cloned().collect())
    }
}

/// Test configuration that never touches the environment.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://unused/test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("kJ8mN2pQ5rS7tU9vW1xY3zA4bC6dE0fG"),
        whatsapp: None,
        sentry_dsn: None,
    }
}

fn price(minor: i64) -> Price {
    Price::from_minor(minor, 2)
}

/// The fixture catalog used by all tests.
///
/// Four products spanning two categories, two collaborators, a sale price,
/// and a price tie (products 2 and 4) to exercise the id tie-break.
#[must_use]
pub fn seed_products() -> Vec<Product> {
    let created = |day: u32| {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0)
            .single()
            .unwrap()
    };
    vec![
        Product {
            id: ProductId::new(1),
            name: "Casual Skirt Suit".to_string(),
            description: Some("Two-piece skirt suit".to_string()),
            price: price(18999),
            sale_price: None,
            category: "Suits".to_string(),
            collaborator: Some("Aya".to_string()),
            colors: vec!["Chocolate".to_string(), "Black".to_string()],
            sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
            images: vec![ProductImage {
                url: "/products/1/main.jpg".to_string(),
                is_main: true,
            }],
            created_at: created(1),
        },
        Product {
            id: ProductId::new(2),
            name: "Straight Cut Long Dress".to_string(),
            description: None,
            price: price(12999),
            sale_price: None,
            category: "Dresses".to_string(),
            collaborator: Some("Emna".to_string()),
            colors: vec!["Beige".to_string()],
            sizes: vec!["S".to_string(), "M".to_string()],
            images: vec![],
            created_at: created(2),
        },
        Product {
            id: ProductId::new(3),
            name: "Wool Overcoat".to_string(),
            description: None,
            price: price(24999),
            sale_price: Some(price(19999)),
            category: "Outerwear".to_string(),
            collaborator: Some("Aya".to_string()),
            colors: vec!["Camel".to_string()],
            sizes: vec!["M".to_string(), "L".to_string()],
            images: vec![ProductImage {
                url: "/products/3/main.jpg".to_string(),
                is_main: true,
            }],
            created_at: created(3),
        },
        Product {
            id: ProductId::new(4),
            name: "Evening Wrap Dress".to_string(),
            description: None,
            price: price(12999),
            sale_price: None,
            category: "Dresses".to_string(),
            collaborator: Some("Emna".to_string()),
            // No variant axes: goes in the cart without a selection
            colors: vec![],
            sizes: vec![],
            images: vec![],
            created_at: created(4),
        },
    ]
}

/// Build the full storefront router over in-memory stores.
///
/// Returns the router and the order store so tests can inspect what was
/// recorded.
#[must_use]
pub fn build_test_app() -> (Router, Arc<MemoryOrders>) {
    let config = test_config();
    let catalog = Arc::new(MemoryCatalog::new(seed_products()));
    let orders = MemoryOrders::new();

    let state = AppState::new(config.clone(), catalog, orders.clone(), None, None);

    let session_layer = session_layer_with_store(MemoryStore::default(), &config);

    let app = routes::routes().layer(session_layer).with_state(state);

    (app, orders)
}

/// Build a JSON request, attaching the session cookie when present.
#[must_use]
pub fn json_request(
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    cookie: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Extract the session cookie pair from a response, if one was set.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?;
    let value = set_cookie.to_str().ok()?;
    // Keep only the name=value pair, dropping the attributes
    value.split(';').next().map(str::to_string)
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
