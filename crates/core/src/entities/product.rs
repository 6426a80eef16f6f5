//! Products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryName, null_as_default};
use crate::types::{CategoryId, ImageUrls, Price, ProductId};

/// A row of the `products` table.
///
/// `image_url`, `long_description` and `data_ai_hint` also accept their
/// camel-case spellings (`imageUrl`, `longDescription`, `dataAiHint`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(
        default,
        alias = "longDescription",
        deserialize_with = "null_as_default"
    )]
    pub long_description: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Raw column value: a JSON array of URLs, or a legacy single URL.
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default, alias = "dataAiHint", deserialize_with = "null_as_default")]
    pub data_ai_hint: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_best_seller: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Present when the query embeds `categories(name)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryName>,
}

impl Product {
    /// The parsed image list.
    #[must_use]
    pub fn images(&self) -> ImageUrls {
        ImageUrls::parse_opt(self.image_url.as_deref())
    }

    /// Embedded category name, if the query asked for it.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.categories.as_ref().map(|c| c.name.as_str())
    }
}

/// A row of the admin product listing:
/// `select=id,name,price,image_url,categories(name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListRow {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub categories: Option<CategoryName>,
}

impl ProductListRow {
    /// Columns to request for this row shape.
    pub const SELECT: &'static str = "id,name,price,image_url,categories(name)";

    /// The parsed image list.
    #[must_use]
    pub fn images(&self) -> ImageUrls {
        ImageUrls::parse_opt(self.image_url.as_deref())
    }

    /// Embedded category name, if the product has a category.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.categories.as_ref().map(|c| c.name.as_str())
    }
}

/// The writable columns of a product, as sent on insert and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub long_description: String,
    pub category_id: CategoryId,
    /// JSON-encoded image list.
    pub image_url: String,
    pub data_ai_hint: String,
    pub is_featured: bool,
    pub is_best_seller: bool,
}
