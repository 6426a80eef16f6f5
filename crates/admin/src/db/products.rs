//! Product repository.

use tracing::instrument;
use verdant_market_backend::{BackendError, Result, SortOrder, SupabaseClient};
use verdant_market_core::{Product, ProductId, ProductListRow, ProductRecord};

/// Columns for the edit form.
const PRODUCT_SELECT: &str = "*,categories(name)";

/// Repository for the `products` table.
pub struct ProductRepository<'a> {
    client: &'a SupabaseClient,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(client: &'a SupabaseClient) -> Self {
        Self { client }
    }

    /// Listing rows joined with the category name, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<ProductListRow>> {
        self.client
            .from("products")
            .select(ProductListRow::SELECT)
            .order("name", SortOrder::Ascending)
            .execute()
            .await
    }

    /// One product by id, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        self.client
            .from("products")
            .select(PRODUCT_SELECT)
            .eq("id", id)
            .maybe_single()
            .await
    }

    /// Insert a product and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the row.
    #[instrument(skip(self, record), fields(name = %record.name))]
    pub async fn insert(&self, record: &ProductRecord) -> Result<Product> {
        let rows: Vec<Product> = self.client.from("products").insert(record).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound("inserted product was not returned".to_string()))
    }

    /// Replace a product's fields and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if no product has this id, or an
    /// error if the backend rejects the change.
    #[instrument(skip(self, record))]
    pub async fn update(&self, id: ProductId, record: &ProductRecord) -> Result<Product> {
        let rows: Vec<Product> = self
            .client
            .from("products")
            .eq("id", id)
            .update(record)
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("product {id}")))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<()> {
        self.client.from("products").eq("id", id).delete().await
    }
}

/// Product listing for the admin table.
///
/// A failed query is logged and rendered as an empty table; the page never
/// shows an error state for it.
pub async fn list_products(client: &SupabaseClient) -> Vec<ProductListRow> {
    ProductRepository::new(client)
        .list_all()
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Error fetching products: {e}");
            Vec::new()
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::extract::RawQuery;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use crate::db::test_support::{stub_client, unreachable_client};

    const PEAR_ID: &str = "8c1f4a2e-5b6d-4e7f-8a9b-0c1d2e3f4a5b";

    fn pear() -> Value {
        json!({
            "id": PEAR_ID,
            "name": "Conference Pears",
            "price": "2.80",
            "description": "Crisp and sweet",
            "long_description": "Grown in Kent.",
            "category_id": "2f3e4d5c-6b7a-4980-a1b2-c3d4e5f60718",
            "image_url": "[]",
            "data_ai_hint": "pears",
            "is_featured": false,
            "is_best_seller": false,
            "categories": { "name": "Fruit" }
        })
    }

    #[tokio::test]
    async fn test_listing_selects_category_join_ordered_by_name() {
        let client = stub_client(Router::new().route(
            "/rest/v1/products",
            get(|RawQuery(query): RawQuery| async move {
                assert_eq!(
                    query.as_deref(),
                    Some("select=id%2Cname%2Cprice%2Cimage_url%2Ccategories%28name%29&order=name.asc")
                );
                Json(json!([
                    { "id": PEAR_ID, "name": "Conference Pears", "price": "2.80", "image_url": "[]", "categories": { "name": "Fruit" } }
                ]))
            }),
        ))
        .await;

        let rows = list_products(&client).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category_name(), Some("Fruit"));
    }

    #[tokio::test]
    async fn test_failed_listing_is_empty() {
        let client = unreachable_client().await;
        assert!(list_products(&client).await.is_empty());

        let client = stub_client(Router::new().route(
            "/rest/v1/products",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "code": "XX000", "message": "boom" })),
                )
            }),
        ))
        .await;
        assert!(list_products(&client).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_product_is_none() {
        let client =
            stub_client(Router::new().route("/rest/v1/products", get(|| async { Json(json!([])) })))
                .await;
        let product = ProductRepository::new(&client)
            .get(PEAR_ID.parse().unwrap())
            .await
            .unwrap();
        assert!(product.is_none());
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_not_found() {
        let client = stub_client(
            Router::new().route("/rest/v1/products", axum::routing::patch(|| async { Json(json!([])) })),
        )
        .await;
        let record = ProductRecord {
            name: "Conference Pears".to_string(),
            price: "2.80".parse().unwrap(),
            description: "Crisp and sweet".to_string(),
            long_description: "Grown in Kent.".to_string(),
            category_id: "2f3e4d5c-6b7a-4980-a1b2-c3d4e5f60718".parse().unwrap(),
            image_url: "[]".to_string(),
            data_ai_hint: "pears".to_string(),
            is_featured: false,
            is_best_seller: false,
        };

        let err = ProductRepository::new(&client)
            .update(PEAR_ID.parse().unwrap(), &record)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_product() {
        let client =
            stub_client(Router::new().route("/rest/v1/products", get(|| async { Json(json!([pear()])) })))
                .await;
        let product = ProductRepository::new(&client)
            .get(PEAR_ID.parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.name, "Conference Pears");
    }
}
