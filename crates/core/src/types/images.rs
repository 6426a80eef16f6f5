//! Product image lists.
//!
//! The `products.image_url` column holds a JSON-encoded array of URLs, e.g.
//! `["https://.../a.webp","https://.../b.webp"]`. Rows written before
//! multi-image support hold a single bare URL instead. [`ImageUrls::parse`]
//! accepts both.

use serde::{Deserialize, Serialize};

/// An ordered list of product image URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageUrls(Vec<String>);

impl ImageUrls {
    /// An empty list.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Parse the stored column value.
    ///
    /// - empty or whitespace → empty list
    /// - JSON array → its string elements, in order (non-strings are skipped)
    /// - other valid JSON (object, number, quoted string) → empty list
    /// - anything that is not JSON → a single-element list with the raw value
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::empty();
        }

        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Array(items)) => Self(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(url) => Some(url),
                        _ => None,
                    })
                    .collect(),
            ),
            Ok(_) => Self::empty(),
            // Legacy single URL
            Err(_) => Self(vec![raw.to_string()]),
        }
    }

    /// Parse an optional column value (`NULL` → empty list).
    #[must_use]
    pub fn parse_opt(raw: Option<&str>) -> Self {
        raw.map_or_else(Self::empty, Self::parse)
    }

    /// Encode for storage in the `image_url` column.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    /// The first image, used as the thumbnail.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Returns `true` if there are no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the URLs in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The URLs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Resolve the list to store after a form submission.
    ///
    /// Newly uploaded images replace the existing list wholesale; when nothing
    /// was uploaded the existing list is kept as-is.
    #[must_use]
    pub fn replace_with_uploads(self, uploaded: Vec<String>) -> Self {
        if uploaded.is_empty() {
            self
        } else {
            Self(uploaded)
        }
    }
}

impl From<Vec<String>> for ImageUrls {
    fn from(urls: Vec<String>) -> Self {
        Self(urls)
    }
}

impl IntoIterator for ImageUrls {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
