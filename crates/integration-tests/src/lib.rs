//! End-to-end tests for Verdant Market.
//!
//! Every test here is `#[ignore]`d: they drive the real binaries over HTTP
//! and need a backend project with seeded data.
//!
//! # Running Tests
//!
//! ```bash
//! cargo run -p verdant-market-storefront &
//! cargo run -p verdant-market-admin &
//!
//! ADMIN_TEST_EMAIL=owner@example.com ADMIN_TEST_PASSWORD=... \
//!     cargo test -p verdant-market-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `STOREFRONT_BASE_URL` (default `http://localhost:3000`)
//! - `ADMIN_BASE_URL` (default `http://localhost:3001`)
//! - `ADMIN_TEST_EMAIL`, `ADMIN_TEST_PASSWORD` - an allow-listed admin

use reqwest::Client;

/// Base URL for the storefront.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin panel.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A client that keeps cookies between requests and does not follow
/// redirects, so tests can assert on them.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// A client signed in to the admin panel as `ADMIN_TEST_EMAIL`.
///
/// # Panics
///
/// Panics if the credentials are missing or sign-in does not redirect to
/// the product list.
pub async fn admin_client() -> Client {
    let email = std::env::var("ADMIN_TEST_EMAIL").expect("ADMIN_TEST_EMAIL must be set");
    let password = std::env::var("ADMIN_TEST_PASSWORD").expect("ADMIN_TEST_PASSWORD must be set");

    let client = client();
    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to sign in");

    assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER, "sign-in refused");
    assert_eq!(
        resp.headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/admin/products")
    );
    client
}
