//! Home page route handler.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;
use verdant_market_core::{HeroSlide, Product};

use crate::db;
use crate::filters;
use crate::layout::{Layout, Page};
use crate::state::AppState;

/// Number of products shown in each home page row.
const HOME_ROW_SIZE: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub hero_slides: Arc<Vec<HeroSlide>>,
    pub featured: Vec<Product>,
    pub best_sellers: Vec<Product>,
}

/// Display the home page.
///
/// The three sections load concurrently; any of them may come back empty.
#[instrument(skip_all)]
pub async fn home(State(state): State<AppState>, page: Page) -> impl IntoResponse {
    let client = state.supabase();
    let (hero_slides, featured, best_sellers) = tokio::join!(
        db::content::active_hero_slides(client, state.hero_slides()),
        db::products::featured_products(client, HOME_ROW_SIZE),
        db::products::best_sellers(client, HOME_ROW_SIZE),
    );

    HomeTemplate {
        layout: page.layout,
        hero_slides,
        featured,
        best_sellers,
    }
}
