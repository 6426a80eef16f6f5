//! PostgREST table queries (`/rest/v1/{table}`).

use std::fmt::Display;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::client::SupabaseClient;
use crate::{BackendError, Result};

/// Sort direction for [`QueryBuilder::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A query against one table.
///
/// Filters and modifiers accumulate as query-string parameters; a terminal
/// method (`execute`, `single`, `insert`, `update`, `delete`) sends it.
#[derive(Debug)]
#[must_use = "a query does nothing until it is executed"]
pub struct QueryBuilder<'a> {
    client: &'a SupabaseClient,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(client: &'a SupabaseClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            select: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Columns to return, including embedded joins like `categories(name)`.
    ///
    /// Whitespace is stripped so multi-line column lists can be passed as-is.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.split_whitespace().collect());
        self
    }

    /// Keep rows where `column = value`.
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Sort by a column. Repeated calls add tie-breakers.
    pub fn order(mut self, column: &str, direction: SortOrder) -> Self {
        self.order
            .push(format!("{column}.{}", direction.as_str()));
        self
    }

    /// Return at most `count` rows.
    pub const fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }

    /// The request URL this query will hit.
    ///
    /// # Errors
    ///
    /// Returns an error if the table name does not form a valid URL.
    pub fn url(&self) -> Result<Url> {
        let mut url = self.client.endpoint(&format!("rest/v1/{}", self.table))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(select) = &self.select {
                pairs.append_pair("select", select);
            }
            for (column, filter) in &self.filters {
                pairs.append_pair(column, filter);
            }
            if !self.order.is_empty() {
                pairs.append_pair("order", &self.order.join(","));
            }
            if let Some(limit) = self.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        // Drop the dangling '?' when nothing was appended
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// Fetch all matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the rows do not deserialize
    /// as `T`.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let url = self.url()?;
        self.client
            .send_json(self.client.request(Method::GET, url))
            .await
    }

    /// Fetch the first matching row, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the row does not deserialize.
    pub async fn maybe_single<T: DeserializeOwned>(self) -> Result<Option<T>> {
        let rows: Vec<T> = self.limit(1).execute().await?;
        Ok(rows.into_iter().next())
    }

    /// Fetch exactly one row.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if no row matches, or any request
    /// error.
    pub async fn single<T: DeserializeOwned>(self) -> Result<T> {
        let table = self.table.clone();
        self.maybe_single()
            .await?
            .ok_or_else(|| BackendError::NotFound(format!("no matching row in {table}")))
    }

    /// Insert a row and return what was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the row.
    #[instrument(skip(self, row), fields(table = %self.table))]
    pub async fn insert<B, T>(self, row: &B) -> Result<Vec<T>>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url()?;
        let request = self
            .client
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(row);
        self.client.send_json(request).await
    }

    /// Update the matching rows and return them.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MissingFilter`] if no `eq` filter was set, or
    /// an error if the backend rejects the change.
    #[instrument(skip(self, changes), fields(table = %self.table))]
    pub async fn update<B, T>(self, changes: &B) -> Result<Vec<T>>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        if self.filters.is_empty() {
            return Err(BackendError::MissingFilter("update"));
        }

        let url = self.url()?;
        let request = self
            .client
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(changes);
        self.client.send_json(request).await
    }

    /// Delete the matching rows.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MissingFilter`] if no `eq` filter was set, or
    /// an error if the backend rejects the delete.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn delete(self) -> Result<()> {
        if self.filters.is_empty() {
            return Err(BackendError::MissingFilter("delete"));
        }

        let url = self.url()?;
        self.client
            .send(self.client.request(Method::DELETE, url))
            .await
            .map(drop)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client() -> SupabaseClient {
        SupabaseClient::new("https://abc.supabase.example", SecretString::from("k")).unwrap()
    }

    #[test]
    fn test_listing_query_url() {
        let client = client();
        let url = client
            .from("products")
            .select(
                "
                id,
                name,
                price,
                image_url,
                categories ( name )
                ",
            )
            .order("name", SortOrder::Ascending)
            .url()
            .unwrap();

        assert_eq!(url.path(), "/rest/v1/products");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [
                ("select".to_string(), "id,name,price,image_url,categories(name)".to_string()),
                ("order".to_string(), "name.asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_filters_order_and_limit() {
        let client = client();
        let url = client
            .from("hero_slides")
            .select("*")
            .eq("is_active", true)
            .order("sort_order", SortOrder::Ascending)
            .order("title", SortOrder::Descending)
            .limit(5)
            .url()
            .unwrap();

        assert_eq!(
            url.query(),
            Some("select=*&is_active=eq.true&order=sort_order.asc%2Ctitle.desc&limit=5")
        );
    }

    #[test]
    fn test_bare_table_has_no_query() {
        let client = client();
        let url = client.from("categories").url().unwrap();
        assert_eq!(url.as_str(), "https://abc.supabase.example/rest/v1/categories");
    }

    #[tokio::test]
    async fn test_update_without_filter_is_refused() {
        let client = client();
        let err = client
            .from("products")
            .update::<_, serde_json::Value>(&serde_json::json!({ "name": "x" }))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::MissingFilter("update")));
    }

    #[tokio::test]
    async fn test_delete_without_filter_is_refused() {
        let err = client().from("products").delete().await.unwrap_err();
        assert!(matches!(err, BackendError::MissingFilter("delete")));
    }
}
