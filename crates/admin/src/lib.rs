//! Verdant Market Admin library.
//!
//! This crate provides the admin functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! This crate holds the backend SERVICE-ROLE key, which bypasses row-level
//! security:
//! - Product writes (insert, update, delete)
//! - Product image uploads
//!
//! Sign-in is limited to the `ADMIN_EMAILS` allow-list. Do not expose the
//! admin port publicly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the admin router.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new("crates/admin/static"))
        .layer(session_layer)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the backend is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.backend().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Readiness check failed: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn test_config() -> config::AdminConfig {
    config::AdminConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        supabase: config::SupabaseAdminConfig {
            url: "http://127.0.0.1:54321".to_string(),
            anon_key: secrecy::SecretString::from("anon-key"),
            service_role_key: secrecy::SecretString::from("service-role-key"),
        },
        admin_emails: vec![verdant_market_core::Email::parse("owner@verdant.test").unwrap()],
        product_images_bucket: "product-images".to_string(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{HeaderMap, Request};
    use std::sync::{Arc, Mutex};

    use axum::routing::post;
    use axum::{Json, Router as StubRouter};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use verdant_market_backend::SupabaseClient;

    use super::*;
    use crate::db::test_support::{stub_client, unreachable_client};

    const PEAR_ID: &str = "8c1f4a2e-5b6d-4e7f-8a9b-0c1d2e3f4a5b";
    const FRUIT_ID: &str = "2f3e4d5c-6b7a-4980-a1b2-c3d4e5f60718";
    const BOUNDARY: &str = "verdant-boundary";

    fn app_with(client: SupabaseClient) -> Router {
        app(AppState::with_clients(test_config(), client.clone(), client))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn login_request(email: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "email={}&password=hunter22",
                email.replace('@', "%40")
            )))
            .unwrap()
    }

    /// `name=value` of the session cookie a response sets.
    fn session_cookie(headers: &HeaderMap) -> String {
        let set_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn multipart_request(uri: &str, cookie: &str, fields: &[(&str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        // A file input with nothing chosen
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image_file\"; filename=\"\"\r\nContent-Type: application/octet-stream\r\n\r\n\r\n"
        ));
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    /// Auth and categories; products are added per test.
    fn auth_stub() -> StubRouter {
        StubRouter::new()
            .route(
                "/auth/v1/token",
                post(|| async {
                    Json(json!({
                        "access_token": "access",
                        "refresh_token": "refresh",
                        "expires_in": 3600,
                        "user": {
                            "id": "5a0c9f1e-2b3d-4c5e-8f70-1a2b3c4d5e6f",
                            "email": "owner@verdant.test",
                            "user_metadata": { "full_name": "Olive Owner" }
                        }
                    }))
                }),
            )
            .route(
                "/rest/v1/categories",
                get(|| async { Json(json!([{ "id": FRUIT_ID, "name": "Fruit" }])) }),
            )
    }

    fn backend_stub() -> StubRouter {
        auth_stub()
            .route(
                "/rest/v1/products",
                get(|| async {
                    Json(json!([{
                        "id": PEAR_ID,
                        "name": "Conference Pears",
                        "price": "2.80",
                        "image_url": "[\"https://cdn.test/pear.webp\"]",
                        "categories": { "name": "Fruit" }
                    }]))
                })
                .post(|Json(mut row): Json<serde_json::Value>| async move {
                    row["id"] = json!(PEAR_ID);
                    Json(json!([row]))
                }),
            )
    }

    const LEGACY_IMAGE: &str = "https://cdn.test/legacy.jpg";

    fn stored_pear() -> Value {
        json!({
            "id": PEAR_ID,
            "name": "Conference Pears",
            "price": "2.80",
            "description": "Crisp and sweet",
            "long_description": "Grown in Kent.",
            "category_id": FRUIT_ID,
            "image_url": LEGACY_IMAGE,
            "data_ai_hint": "pears",
            "is_featured": false,
            "is_best_seller": false,
            "categories": { "name": "Fruit" }
        })
    }

    /// One stored pear with a legacy single image URL. Updates are recorded;
    /// `reject_updates` makes the backend refuse them.
    fn edit_stub(updated: Arc<Mutex<Option<Value>>>, reject_updates: bool) -> StubRouter {
        auth_stub().route(
            "/rest/v1/products",
            get(|| async { Json(json!([stored_pear()])) }).patch(
                move |Json(changes): Json<Value>| {
                    let updated = updated.clone();
                    async move {
                        if reject_updates {
                            return (
                                StatusCode::CONFLICT,
                                Json(json!({ "code": "23505", "message": "duplicate key value" })),
                            );
                        }
                        *updated.lock().unwrap() = Some(changes.clone());
                        let mut row = stored_pear();
                        row["name"] = changes["name"].clone();
                        (StatusCode::OK, Json(json!([row])))
                    }
                },
            ),
        )
    }

    fn pear_fields(image_url: &str) -> Vec<(&'static str, String)> {
        vec![
            ("name", "Comice Pears".to_string()),
            ("price", "3.10".to_string()),
            ("description", "Buttery".to_string()),
            ("long_description", "Grown in Kent.".to_string()),
            ("category_id", FRUIT_ID.to_string()),
            ("data_ai_hint", "pears".to_string()),
            ("image_url", image_url.to_string()),
        ]
    }

    async fn signed_in(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(login_request("owner@verdant.test"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie(response.headers())
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(unreachable_client().await);
        let response = app.oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_readiness_reports_unreachable_backend() {
        let app = app_with(unreachable_client().await);
        let response = app.oneshot(get_request("/health/ready", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_products_require_sign_in() {
        let app = app_with(unreachable_client().await);
        let response = app
            .clone()
            .oneshot(get_request("/admin/products", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");

        let htmx = Request::builder()
            .uri("/admin/products")
            .header("hx-request", "true")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(htmx).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["hx-redirect"], "/auth/login");
    }

    #[tokio::test]
    async fn test_non_admin_email_is_refused() {
        let app = app_with(stub_client(backend_stub()).await);
        let response = app
            .oneshot(login_request("shopper@verdant.test"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Invalid email or password."));
    }

    #[tokio::test]
    async fn test_product_table_lists_products() {
        let app = app_with(stub_client(backend_stub()).await);
        let cookie = signed_in(&app).await;

        let response = app
            .oneshot(get_request("/admin/products", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Conference Pears"));
        assert!(body.contains("$2.80"));
        assert!(body.contains("https://cdn.test/pear.webp"));
        assert!(body.contains(&format!("/admin/products/{PEAR_ID}/edit")));
        assert!(body.contains("Olive Owner"));
    }

    #[tokio::test]
    async fn test_failed_listing_renders_empty_table() {
        let stub = auth_stub().route(
            "/rest/v1/products",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "code": "XX000", "message": "boom" })),
                )
            }),
        );
        let app = app_with(stub_client(stub).await);
        let cookie = signed_in(&app).await;

        let response = app
            .oneshot(get_request("/admin/products", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("No products found"));
        assert!(!body.contains("boom"));
    }

    #[tokio::test]
    async fn test_add_form_lists_categories() {
        let app = app_with(stub_client(backend_stub()).await);
        let cookie = signed_in(&app).await;

        let response = app
            .oneshot(get_request("/admin/products/add", Some(&cookie)))
            .await
            .unwrap();
        let body = body_text(response).await;
        assert!(body.contains("Select a category"));
        assert!(body.contains(&format!("value=\"{FRUIT_ID}\"")));
        assert!(body.contains("Add Product"));
        assert!(!body.contains("name=\"image_url\""));

        let year = chrono::Datelike::year(&chrono::Utc::now());
        assert!(body.contains(&format!("&copy; {year} Verdant Market")));
    }

    #[tokio::test]
    async fn test_invalid_submission_rerenders_with_field_errors() {
        let app = app_with(stub_client(backend_stub()).await);
        let cookie = signed_in(&app).await;

        let request = multipart_request(
            "/admin/products/add",
            &cookie,
            &[("name", ""), ("price", "2.80"), ("category_id", FRUIT_ID)],
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Name is required"));
        assert!(body.contains("Description is required"));
        assert!(body.contains("Please correct the errors below."));
        assert!(body.contains("toast-destructive"));
    }

    #[tokio::test]
    async fn test_successful_add_redirects_and_flashes() {
        let app = app_with(stub_client(backend_stub()).await);
        let cookie = signed_in(&app).await;

        let request = multipart_request(
            "/admin/products/add",
            &cookie,
            &[
                ("name", "Conference Pears"),
                ("price", "2.80"),
                ("description", "Crisp and sweet"),
                ("long_description", "Grown in Kent."),
                ("category_id", FRUIT_ID),
                ("data_ai_hint", "pears"),
                ("is_featured", "on"),
            ],
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin/products");

        let response = app
            .clone()
            .oneshot(get_request("/admin/products", Some(&cookie)))
            .await
            .unwrap();
        let body = body_text(response).await;
        assert!(body.contains("Success!"));
        assert!(body.contains("Product added successfully."));

        // Shown once
        let response = app
            .oneshot(get_request("/admin/products", Some(&cookie)))
            .await
            .unwrap();
        assert!(!body_text(response).await.contains("Product added successfully."));
    }

    #[tokio::test]
    async fn test_edit_of_malformed_id_is_not_found() {
        let app = app_with(stub_client(backend_stub()).await);
        let cookie = signed_in(&app).await;

        let response = app
            .oneshot(get_request("/admin/products/pears/edit", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_form_locks_submit_in_the_browser() {
        let app = app_with(stub_client(backend_stub()).await);
        let cookie = signed_in(&app).await;

        let response = app
            .oneshot(get_request("/admin/products/add", Some(&cookie)))
            .await
            .unwrap();
        let body = body_text(response).await;
        assert!(body.contains("data-single-flight"));
        assert!(body.contains("data-pending-label=\"Adding...\""));
        assert!(!body.contains(" disabled"));
    }

    #[tokio::test]
    async fn test_edit_page_carries_stored_images() {
        let updated = Arc::new(Mutex::new(None));
        let app = app_with(stub_client(edit_stub(updated, false)).await);
        let cookie = signed_in(&app).await;

        let response = app
            .oneshot(get_request(&format!("/admin/products/{PEAR_ID}/edit"), Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(&format!("name=\"image_url\" value=\"{LEGACY_IMAGE}\"")));
        assert!(body.contains(&format!("<img src=\"{LEGACY_IMAGE}\"")));
        assert!(body.contains("data-pending-label=\"Updating...\""));
        assert!(body.contains("Update Product"));
    }

    #[tokio::test]
    async fn test_successful_edit_stays_on_form_and_keeps_images() {
        let updated = Arc::new(Mutex::new(None));
        let app = app_with(stub_client(edit_stub(updated.clone(), false)).await);
        let cookie = signed_in(&app).await;

        let fields = pear_fields(LEGACY_IMAGE);
        let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let request =
            multipart_request(&format!("/admin/products/{PEAR_ID}/edit"), &cookie, &fields);
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        let body = body_text(response).await;
        assert!(body.contains("Success!"));
        assert!(body.contains("Product updated successfully."));

        let changes = updated.lock().unwrap().clone().unwrap();
        assert_eq!(changes["name"], "Comice Pears");
        assert_eq!(
            verdant_market_core::ImageUrls::parse(changes["image_url"].as_str().unwrap())
                .as_slice(),
            [LEGACY_IMAGE]
        );
    }

    #[tokio::test]
    async fn test_failed_edit_does_not_redirect() {
        let updated = Arc::new(Mutex::new(None));
        let app = app_with(stub_client(edit_stub(updated.clone(), true)).await);
        let cookie = signed_in(&app).await;

        let fields = pear_fields(LEGACY_IMAGE);
        let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let request =
            multipart_request(&format!("/admin/products/{PEAR_ID}/edit"), &cookie, &fields);
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        let body = body_text(response).await;
        assert!(body.contains("toast-destructive"));
        assert!(body.contains("Failed to update product: duplicate key value"));
        assert!(body.contains("value=\"Comice Pears\""));
        assert!(updated.lock().unwrap().is_none());
    }
}
