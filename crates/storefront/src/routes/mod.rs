//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (hero slides, featured, best sellers)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (backend reachable)
//!
//! # Products
//! GET  /products               - Product listing (?category=<id>)
//! GET  /products/{id}          - Product detail with reviews
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! POST /auth/logout            - Logout action
//! ```
//!
//! Every page handler takes the [`Page`](crate::layout::Page) extractor, so
//! the shared layout is primed before the handler runs.

pub mod auth;
pub mod home;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::filters;
use crate::layout::{Layout, Page};
use crate::state::AppState;

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
}

/// Render the not-found page with a 404 status.
pub fn not_found(layout: Layout) -> Response {
    (StatusCode::NOT_FOUND, NotFoundTemplate { layout }).into_response()
}

/// Fallback for unknown paths.
pub async fn fallback(page: Page) -> Response {
    not_found(page.layout)
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Auth routes
        .nest("/auth", auth_routes())
        .fallback(fallback)
}
