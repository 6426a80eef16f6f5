//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;
use verdant_market_core::{CategoryId, ImageUrls, Product, ProductId, ReviewWithAuthor};

use crate::db;
use crate::filters;
use crate::layout::{Layout, Page};
use crate::routes::not_found;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    /// Category id; anything that is not a UUID shows all products.
    pub category: Option<String>,
}

impl ListingQuery {
    fn category_id(&self) -> Option<CategoryId> {
        self.category.as_deref().and_then(|raw| raw.parse().ok())
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub products: Vec<Product>,
    /// Name of the selected category, when filtering.
    pub category_name: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: Product,
    pub images: ImageUrls,
    pub reviews: Vec<ReviewWithAuthor>,
}

/// Display product listing page.
#[instrument(skip(page))]
pub async fn index(page: Page, Query(query): Query<ListingQuery>) -> impl IntoResponse {
    let category = query.category_id();
    let products = db::products::list_products(&page.backend, category).await;

    let category_name = category.and_then(|id| {
        page.layout
            .categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
    });

    ProductsIndexTemplate {
        layout: page.layout,
        products,
        category_name,
    }
}

/// Display product detail page.
///
/// Unknown ids, malformed ids and failed lookups all render the 404 page.
#[instrument(skip(page))]
pub async fn show(page: Page, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<ProductId>() else {
        return not_found(page.layout);
    };

    let (product, reviews) = tokio::join!(
        db::products::get_product(&page.backend, id),
        db::reviews::reviews_for_product(&page.backend, id),
    );

    let Some(product) = product else {
        return not_found(page.layout);
    };

    ProductShowTemplate {
        layout: page.layout,
        images: product.images(),
        product,
        reviews,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_query_ignores_malformed_category() {
        let query = ListingQuery {
            category: Some("fruit".to_string()),
        };
        assert!(query.category_id().is_none());

        let query = ListingQuery {
            category: Some("2f3e4d5c-6b7a-4980-a1b2-c3d4e5f60718".to_string()),
        };
        assert!(query.category_id().is_some());

        assert!(ListingQuery::default().category_id().is_none());
    }
}
