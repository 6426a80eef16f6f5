//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Redirect to the product list
//!
//! # Auth (backend password sign-in, allow-listed emails only)
//! GET  /auth/login                    - Login page
//! POST /auth/login                    - Sign in
//! POST /auth/logout                   - Sign out
//!
//! # Products
//! GET  /admin/products                - Product table
//! GET  /admin/products/add            - New product form
//! POST /admin/products/add            - Create product (multipart)
//! GET  /admin/products/{id}/edit      - Edit product form
//! POST /admin/products/{id}/edit      - Update product (multipart)
//! POST /admin/products/{id}/delete    - Delete product
//! ```

pub mod auth;
pub mod products;

use askama::Template;
use axum::{
    Router,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};

use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to(products::LIST_PATH) }))
        .merge(auth::router())
        .merge(products::router())
}

/// Render a template, logging and masking render failures.
fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Navigate after a form post.
///
/// HTMX requests get `HX-Redirect` so the whole page changes instead of the
/// target fragment; plain posts get `303 See Other`.
fn see_other(headers: &HeaderMap, to: &str) -> Response {
    if headers.contains_key("hx-request") {
        (StatusCode::OK, [("HX-Redirect", to.to_string())]).into_response()
    } else {
        Redirect::to(to).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, header};

    use super::*;

    #[test]
    fn test_see_other_for_plain_posts() {
        let response = see_other(&HeaderMap::new(), "/admin/products");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin/products");
    }

    #[test]
    fn test_see_other_for_htmx_posts() {
        let mut headers = HeaderMap::new();
        headers.insert("hx-request", HeaderValue::from_static("true"));
        let response = see_other(&headers, "/admin/products");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["hx-redirect"], "/admin/products");
    }
}
