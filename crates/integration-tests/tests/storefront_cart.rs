//! Integration tests for the storefront cart flow.
//!
//! These tests require:
//! - A reachable remote store project with the sample catalog seeded
//!   (gg-cli seed products)
//! - The storefront server running (cargo run -p gadget-grove-storefront)
//! - A confirmed test account in the environment: `TEST_USER_EMAIL`,
//!   `TEST_USER_PASSWORD`
//!
//! Run with: cargo test -p gadget-grove-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use gadget_grove_integration_tests::{session_client, storefront_base_url};

fn test_credentials() -> (String, String) {
    let email =
        std::env::var("TEST_USER_EMAIL").unwrap_or_else(|_| "shopper@example.com".to_string());
    let password = std::env::var("TEST_USER_PASSWORD").unwrap_or_else(|_| "secret-pw".to_string());
    (email, password)
}

/// Sign in and return the same client with its session cookie set.
async fn signed_in_client() -> Client {
    let client = session_client();
    let (email, password) = test_credentials();

    let resp = client
        .post(format!("{}/auth/login", storefront_base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to sign in");
    assert_eq!(resp.status(), StatusCode::OK);

    client
}

/// Pick a product id off the public catalog.
async fn any_product_id(client: &Client) -> String {
    let body: Value = client
        .get(format!("{}/products", storefront_base_url()))
        .send()
        .await
        .expect("Failed to fetch catalog")
        .json()
        .await
        .expect("Failed to decode catalog");

    body["products"][0]["id"]
        .as_str()
        .expect("Catalog is empty; run gg-cli seed products")
        .to_string()
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded remote store"]
async fn catalog_products_carry_synthetic_variants() {
    let client = session_client();
    let body: Value = client
        .get(format!("{}/products", storefront_base_url()))
        .send()
        .await
        .expect("Failed to fetch catalog")
        .json()
        .await
        .expect("Failed to decode catalog");

    let groups = body["products"][0]["variant_groups"]
        .as_array()
        .expect("variant groups");
    let ids: Vec<&str> = groups.iter().filter_map(|g| g["id"].as_str()).collect();
    assert_eq!(ids, vec!["ram", "storage", "processor"]);
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded remote store"]
async fn cart_mutations_require_a_session() {
    let client = session_client();

    let resp = client
        .post(format!("{}/cart/items", storefront_base_url()))
        .json(&json!({ "product_id": "p-1", "quantity": 1 }))
        .send()
        .await
        .expect("Failed to call add");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to decode body");
    assert_eq!(body["notice"]["level"], "error");
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded remote store"]
async fn adding_the_same_product_twice_folds_into_one_line() {
    let client = signed_in_client().await;
    let base_url = storefront_base_url();
    let product_id = any_product_id(&client).await;

    // Start clean
    let resp = client
        .post(format!("{base_url}/checkout"))
        .send()
        .await
        .expect("Failed to clear cart");
    assert_eq!(resp.status(), StatusCode::OK);

    for quantity in [1, 2] {
        let resp = client
            .post(format!("{base_url}/cart/items"))
            .json(&json!({ "product_id": product_id, "quantity": quantity }))
            .send()
            .await
            .expect("Failed to add to cart");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to decode cart");

    let items = cart["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(cart["totals"]["total_items"], 3);
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded remote store"]
async fn checkout_clears_the_cart() {
    let client = signed_in_client().await;
    let base_url = storefront_base_url();
    let product_id = any_product_id(&client).await;

    let resp = client
        .post(format!("{base_url}/cart/items"))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/checkout"))
        .send()
        .await
        .expect("Failed to checkout");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to decode body");
    assert_eq!(body["notice"]["message"], "Order placed successfully");

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to decode cart");
    assert!(cart["items"].as_array().expect("items").is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded remote store"]
async fn removing_an_unknown_item_surfaces_a_notice_without_failing_the_cart() {
    let client = signed_in_client().await;
    let base_url = storefront_base_url();

    let resp = client
        .delete(format!("{base_url}/cart/items/no-such-item"))
        .send()
        .await
        .expect("Failed to call remove");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to decode body");
    assert_eq!(body["notice"]["level"], "error");
}
