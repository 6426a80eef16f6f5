//! Category repository.

use tracing::instrument;
use verdant_market_backend::{Result, SortOrder, SupabaseClient};
use verdant_market_core::Category;

/// Repository for the `categories` table.
pub struct CategoryRepository<'a> {
    client: &'a SupabaseClient,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(client: &'a SupabaseClient) -> Self {
        Self { client }
    }

    /// All categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Category>> {
        self.client
            .from("categories")
            .select("id,name")
            .order("name", SortOrder::Ascending)
            .execute()
            .await
    }
}
