//! Order submission through the HTTP API.
//!
//! With no WhatsApp sender configured the notification step is skipped, so
//! these tests cover recording, validation, and the session-cart handoff.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use ramadhane_core::{OrderId, ProductId};
use ramadhane_integration_tests::{build_test_app, json_request, read_json, session_cookie};
use ramadhane_storefront::db::OrderStore;

fn order_body() -> serde_json::Value {
    json!({
        "customerName": "Mariem Ben Salah",
        "phoneNumber": "+216 20 123 456",
        "address": "12 Avenue Habib Bourguiba, Tunis",
        "totalAmount": "395.97",
        "items": [
            {"productId": 1, "quantity": 2, "size": "M", "color": "Black", "price": "189.99"},
            {"productId": 4, "quantity": 1, "size": "", "color": "", "price": "129.99"}
        ]
    })
}

#[tokio::test]
async fn submission_records_the_order() {
    let (app, orders) = build_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/orders", Some(order_body()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["orderId"], 1);
    assert_eq!(body["totalAmount"], "395.97");

    let recorded = orders.recorded();
    assert_eq!(recorded.len(), 1);
    let order = &recorded[0];
    assert_eq!(order.id, OrderId::new(1));
    assert_eq!(order.customer_name, "Mariem Ben Salah");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].product_id, ProductId::new(1));
    assert_eq!(order.items[0].quantity, 2);
}

#[tokio::test]
async fn recent_orders_list_newest_first() {
    let (app, orders) = build_test_app();

    for name in ["First Customer", "Second Customer"] {
        let mut body = order_body();
        body["customerName"] = json!(name);
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/orders", Some(body), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let recent = orders.list_recent().await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].customer_name, "Second Customer");
    assert_eq!(recent[1].customer_name, "First Customer");
}

#[tokio::test]
async fn empty_orders_are_rejected() {
    let (app, orders) = build_test_app();

    let mut body = order_body();
    body["items"] = json!([]);

    let response = app
        .oneshot(json_request("POST", "/api/orders", Some(body), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(orders.recorded().is_empty());
}

#[tokio::test]
async fn blank_contact_details_are_rejected() {
    let (app, orders) = build_test_app();

    for field in ["customerName", "phoneNumber", "address"] {
        let mut body = order_body();
        body[field] = json!("   ");

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/orders", Some(body), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {field}");
    }
    assert!(orders.recorded().is_empty());
}

#[tokio::test]
async fn submission_clears_the_session_cart() {
    let (app, _orders) = build_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/cart/items",
            Some(json!({"productId": 4})),
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response).expect("session cookie");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            Some(order_body()),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request("GET", "/api/cart", None, Some(&cookie)))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["totalItems"], 0);
}
