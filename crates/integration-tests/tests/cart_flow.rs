//! End-to-end cart flow through the HTTP API.
//!
//! One session, many mutations: the session cookie from the first response
//! is carried through the rest of the flow by hand.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use ramadhane_integration_tests::{build_test_app, json_request, read_json, session_cookie};

#[tokio::test]
async fn add_merge_update_remove_clear() {
    let (app, _orders) = build_test_app();

    // First add creates the session
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/cart/items",
            Some(json!({"productId": 1, "size": "M", "color": "Black"})),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("first cart write should set a session cookie");
    let body = read_json(response).await;
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    // Same configuration again merges into the existing line
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/cart/items",
            Some(json!({"productId": 1, "size": "M", "color": "Black"})),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["totalItems"], 2);

    // A different size is a distinct line
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/cart/items",
            Some(json!({"productId": 1, "size": "L", "color": "Black"})),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["totalItems"], 3);
    // 3 units at 189.99
    assert_eq!(body["totalPrice"], "569.97");

    // Absolute quantity update on the first line
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/cart/items",
            Some(json!({"productId": 1, "size": "M", "color": "Black", "quantity": 5})),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["items"][0]["quantity"], 5);
    assert_eq!(body["totalItems"], 6);

    // Quantity 0 clamps to 1 instead of deleting the line
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/cart/items",
            Some(json!({"productId": 1, "size": "M", "color": "Black", "quantity": 0})),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["quantity"], 1);
    assert_eq!(body["totalItems"], 2);

    // Explicit removal drops the line
    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/api/cart/items",
            Some(json!({"productId": 1, "size": "L", "color": "Black"})),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["totalItems"], 1);

    // Clear empties the cart, and the session agrees on the next read
    let response = app
        .clone()
        .oneshot(json_request("DELETE", "/api/cart", None, Some(&cookie)))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["totalItems"], 0);

    let response = app
        .oneshot(json_request("GET", "/api/cart", None, Some(&cookie)))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["totalPrice"], "0");
}

#[tokio::test]
async fn add_requires_variant_selection() {
    let (app, _orders) = build_test_app();

    // Product 1 has size and color axes
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/cart/items",
            Some(json!({"productId": 1})),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Please select a size");

    // Unavailable size is rejected even though the axis was filled in
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/cart/items",
            Some(json!({"productId": 1, "size": "XXL", "color": "Black"})),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Product 4 has no axes, so no selection is needed
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
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["items"][0]["size"], "");
    assert_eq!(body["items"][0]["color"], "");

    // Unknown product
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/cart/items",
            Some(json!({"productId": 99})),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cart_count_tracks_total_units() {
    let (app, _orders) = build_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/cart/items",
            Some(json!({"productId": 2, "size": "S", "color": "Beige"})),
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response).expect("session cookie");

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/cart/items",
            Some(json!({"productId": 2, "size": "S", "color": "Beige", "quantity": 4})),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request("GET", "/api/cart/count", None, Some(&cookie)))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn sessions_do_not_share_carts() {
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
    assert_eq!(response.status(), StatusCode::OK);

    // A request without the cookie sees an empty cart
    let response = app
        .oneshot(json_request("GET", "/api/cart", None, None))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["totalItems"], 0);
}
