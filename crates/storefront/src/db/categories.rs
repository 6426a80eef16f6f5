//! Category queries.

use tracing::instrument;
use verdant_market_backend::{SortOrder, SupabaseClient};
use verdant_market_core::Category;

/// All categories, ordered by name. Empty on failure.
#[instrument(skip(client))]
pub async fn list_categories(client: &SupabaseClient) -> Vec<Category> {
    client
        .from("categories")
        .select("*")
        .order("name", SortOrder::Ascending)
        .execute()
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Error fetching categories: {e}");
            Vec::new()
        })
}
