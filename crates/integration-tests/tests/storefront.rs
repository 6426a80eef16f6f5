//! End-to-end tests for the storefront.
//!
//! These tests require:
//! - The storefront running (cargo run -p verdant-market-storefront)
//! - A backend project with categories and products

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use verdant_market_integration_tests::{client, storefront_base_url};

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_health_endpoints() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client.get(format!("{base_url}/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront and backend data"]
async fn test_home_page_renders_layout() {
    let resp = client().get(storefront_base_url()).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Verdant Market"));
    assert!(body.contains("/products?category="), "category nav is empty");
    assert!(body.contains("Sign in"));
}

#[tokio::test]
#[ignore = "Requires running storefront and backend data"]
async fn test_product_listing() {
    let resp = client()
        .get(format!("{}/products", storefront_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("/products/"));
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_unknown_product_is_not_found() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/products/{}", uuid::Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .get(format!("{base_url}/products/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_bad_credentials_return_to_login() {
    let resp = client()
        .post(format!("{}/auth/login", storefront_base_url()))
        .form(&[("email", "nobody@example.com"), ("password", "wrong-password")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(reqwest::header::LOCATION).unwrap(),
        "/auth/login?error=credentials"
    );
}
