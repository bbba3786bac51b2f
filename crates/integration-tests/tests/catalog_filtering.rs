//! Catalog listing, filtering, and sorting through the HTTP API.

use axum::http::StatusCode;
use tower::ServiceExt;

use ramadhane_integration_tests::{build_test_app, json_request, read_json};

async fn listed_ids(uri: &str) -> (String, Vec<i64>) {
    let (app, _orders) = build_test_app();
    let response = app
        .oneshot(json_request("GET", uri, None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let ids = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    (body["heading"].as_str().unwrap().to_string(), ids)
}

#[tokio::test]
async fn neutral_listing_returns_everything_in_id_order() {
    let (heading, ids) = listed_ids("/api/products").await;
    assert_eq!(heading, "All Collections");
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn category_filter_is_case_insensitive() {
    let (heading, ids) = listed_ids("/api/products?category=DRESSES").await;
    assert_eq!(heading, "Dresses");
    assert_eq!(ids, vec![2, 4]);
}

#[tokio::test]
async fn all_category_is_neutral() {
    let (heading, ids) = listed_ids("/api/products?category=all").await;
    assert_eq!(heading, "All Collections");
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn unknown_category_falls_back_to_all() {
    let (heading, ids) = listed_ids("/api/products?category=nonsense").await;
    assert_eq!(heading, "All Collections");
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn collaborator_filter_and_heading() {
    let (heading, ids) = listed_ids("/api/products?collaborator=Emna").await;
    assert_eq!(heading, "All Collections modeled by Emna");
    assert_eq!(ids, vec![2, 4]);
}

#[tokio::test]
async fn product_slug_matches_by_reconstructed_name() {
    let (heading, ids) = listed_ids("/api/products?product=straight-cut-long-dress").await;
    assert_eq!(heading, "Straight Cut Long Dress");
    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn price_sorts_break_ties_by_id() {
    // Products 2 and 4 share a price
    let (_, ids) = listed_ids("/api/products?sort=price-asc").await;
    assert_eq!(ids, vec![2, 4, 1, 3]);

    let (_, ids) = listed_ids("/api/products?sort=price-desc").await;
    assert_eq!(ids, vec![3, 1, 2, 4]);
}

#[tokio::test]
async fn newest_sorts_by_creation_time_descending() {
    let (_, ids) = listed_ids("/api/products?sort=newest").await;
    assert_eq!(ids, vec![4, 3, 2, 1]);
}

#[tokio::test]
async fn filters_and_sort_compose() {
    let (_, ids) = listed_ids("/api/products?category=dresses&sort=price-desc").await;
    assert_eq!(ids, vec![2, 4]);
}

#[tokio::test]
async fn size_filter_matches_axis_membership() {
    let (_, ids) = listed_ids("/api/products?size=L").await;
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn product_detail_and_not_found() {
    let (app, _orders) = build_test_app();

    let response = app
        .clone()
        .oneshot(json_request("GET", "/api/products/3", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["id"], 3);
    assert_eq!(body["name"], "Wool Overcoat");
    assert_eq!(body["salePrice"], "199.99");
    assert_eq!(body["images"][0]["isMain"], true);

    let response = app
        .oneshot(json_request("GET", "/api/products/99", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
