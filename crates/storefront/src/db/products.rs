//! Product queries for the storefront pages.

use tracing::instrument;
use verdant_market_backend::{BackendError, SortOrder, SupabaseClient};
use verdant_market_core::{CategoryId, Product, ProductId};

/// Columns for product cards and detail pages.
const PRODUCT_SELECT: &str = "*,categories(name)";

/// Products ordered by name, optionally limited to one category.
/// Empty on failure.
#[instrument(skip(client))]
pub async fn list_products(client: &SupabaseClient, category: Option<CategoryId>) -> Vec<Product> {
    let mut query = client
        .from("products")
        .select(PRODUCT_SELECT)
        .order("name", SortOrder::Ascending);
    if let Some(category) = category {
        query = query.eq("category_id", category);
    }

    query.execute().await.unwrap_or_else(|e| {
        tracing::error!("Error fetching products: {e}");
        Vec::new()
    })
}

/// Products flagged as featured, newest first. Empty on failure.
#[instrument(skip(client))]
pub async fn featured_products(client: &SupabaseClient, limit: usize) -> Vec<Product> {
    flagged(client, "is_featured", limit).await
}

/// Products flagged as best sellers, newest first. Empty on failure.
#[instrument(skip(client))]
pub async fn best_sellers(client: &SupabaseClient, limit: usize) -> Vec<Product> {
    flagged(client, "is_best_seller", limit).await
}

async fn flagged(client: &SupabaseClient, flag: &str, limit: usize) -> Vec<Product> {
    client
        .from("products")
        .select(PRODUCT_SELECT)
        .eq(flag, true)
        .order("created_at", SortOrder::Descending)
        .limit(limit)
        .execute()
        .await
        .unwrap_or_else(|e| {
            tracing::error!(flag, "Error fetching flagged products: {e}");
            Vec::new()
        })
}

/// One product by id. `None` when missing or on failure.
#[instrument(skip(client))]
pub async fn get_product(client: &SupabaseClient, id: ProductId) -> Option<Product> {
    match client
        .from("products")
        .select(PRODUCT_SELECT)
        .eq("id", id)
        .maybe_single()
        .await
    {
        Ok(product) => product,
        // Malformed ids surface as 400 from the backend; treat as missing
        Err(BackendError::Api { status: 400, .. }) => None,
        Err(e) => {
            tracing::error!("Error fetching product: {e}");
            None
        }
    }
}
