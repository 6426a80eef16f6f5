//! Review queries.

use tracing::instrument;
use verdant_market_backend::{SortOrder, SupabaseClient};
use verdant_market_core::{ProductId, ReviewWithAuthor};

/// Reviews for a product with author profiles, newest first. Empty on failure.
#[instrument(skip(client))]
pub async fn reviews_for_product(client: &SupabaseClient, product: ProductId) -> Vec<ReviewWithAuthor> {
    client
        .from("reviews")
        .select(ReviewWithAuthor::SELECT)
        .eq("product_id", product)
        .order("created_at", SortOrder::Descending)
        .execute()
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Error fetching reviews: {e}");
            Vec::new()
        })
}
