//! Integration tests for the cart endpoints.

#![allow(clippy::unwrap_used)]

use mosso_integration_tests::TestServer;
use serde_json::{Value, json};

async fn send(request: reqwest::RequestBuilder) -> (u16, Value) {
    let response = request.send().await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

fn quantities(summary: &Value) -> Vec<(i64, i64)> {
    summary["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| {
            (
                line["product"]["id"].as_i64().unwrap(),
                line["quantity"].as_i64().unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_empty_cart() {
    let server = TestServer::spawn().await;
    let (status, body) = send(server.client.get(server.url("/api/cart"))).await;
    assert_eq!(status, 200);
    assert!(body["lines"].as_array().unwrap().is_empty());
    assert_eq!(body["subtotal_display"], "$0.00");
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_add_then_update_to_zero() {
    let server = TestServer::spawn().await;
    let items = server.url("/api/cart/items");

    send(server.client.post(&items).json(&json!({ "product_id": 1 }))).await;
    let (status, body) = send(
        server
            .client
            .post(&items)
            .json(&json!({ "product_id": 1, "quantity": 2 })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(quantities(&body), vec![(1, 3)]);
    assert_eq!(body["count"], 1);
    assert_eq!(body["subtotal_display"], "$555.00");

    let (_, body) = send(
        server
            .client
            .put(server.url("/api/cart/items/1"))
            .json(&json!({ "quantity": 0 })),
    )
    .await;
    assert!(quantities(&body).is_empty());
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_count_is_distinct_products() {
    let server = TestServer::spawn().await;
    let items = server.url("/api/cart/items");
    send(server.client.post(&items).json(&json!({ "product_id": 1, "quantity": 3 }))).await;
    send(server.client.post(&items).json(&json!({ "product_id": 2 }))).await;

    let (_, body) = send(server.client.get(server.url("/api/cart/count"))).await;
    assert_eq!(body, json!({ "count": 2 }));
}

#[tokio::test]
async fn test_remove_and_clear() {
    let server = TestServer::spawn().await;
    let items = server.url("/api/cart/items");
    for id in [2, 5, 7] {
        send(server.client.post(&items).json(&json!({ "product_id": id }))).await;
    }

    let (_, body) = send(server.client.delete(server.url("/api/cart/items/5"))).await;
    assert_eq!(quantities(&body), vec![(2, 1), (7, 1)]);

    // Removing an absent product is a no-op.
    let (status, body) = send(server.client.delete(server.url("/api/cart/items/5"))).await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 2);

    let (_, body) = send(server.client.delete(server.url("/api/cart"))).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let server = TestServer::spawn().await;
    let (status, body) = send(
        server
            .client
            .post(server.url("/api/cart/items"))
            .json(&json!({ "product_id": 404 })),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Not found: product 404");

    let (_, count) = send(server.client.get(server.url("/api/cart/count"))).await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_product_detail_reports_cart_quantity() {
    let server = TestServer::spawn().await;
    send(
        server
            .client
            .post(server.url("/api/cart/items"))
            .json(&json!({ "product_id": 4, "quantity": 2 })),
    )
    .await;

    let (_, body) = send(server.client.get(server.url("/api/products/4"))).await;
    assert_eq!(body["in_cart"], 2);
}
