//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, ReviewId, UserId};

/// A row of the `reviews` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    /// 1 to 5.
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The `user_profiles(full_name, avatar_url)` embed on a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A review joined with its author's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    pub review: Review,
    #[serde(default)]
    pub user_profiles: Option<ReviewAuthor>,
}

impl ReviewWithAuthor {
    /// Columns to request for this row shape.
    pub const SELECT: &'static str = "*,user_profiles(full_name,avatar_url)";

    /// The author's name, or "Anonymous" when the profile is missing or blank.
    #[must_use]
    pub fn author_name(&self) -> &str {
        self.user_profiles
            .as_ref()
            .and_then(|profile| profile.full_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Anonymous")
    }

    /// Rating clamped to the 0..=5 star range.
    #[must_use]
    pub fn stars(&self) -> u8 {
        self.review.rating.min(5)
    }
}
