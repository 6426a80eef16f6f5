//! Client for the Verdant Market backend.
//!
//! The backend is a hosted Supabase project. This crate speaks its three HTTP
//! surfaces directly with `reqwest`:
//!
//! - **REST** (`/rest/v1/{table}`): PostgREST table queries
//! - **Auth** (`/auth/v1`): password sign-in, user lookup, sign-out
//! - **Storage** (`/storage/v1/object`): uploads and public URLs
//!
//! # Example
//!
//! ```rust,ignore
//! use verdant_market_backend::{SortOrder, SupabaseClient};
//! use verdant_market_core::Category;
//!
//! let client = SupabaseClient::new(&url, anon_key)?;
//!
//! let categories: Vec<Category> = client
//!     .from("categories")
//!     .select("*")
//!     .order("name", SortOrder::Ascending)
//!     .execute()
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod auth;
mod client;
mod query;
mod storage;

pub use auth::{AuthApi, AuthSession};
pub use client::SupabaseClient;
pub use query::{QueryBuilder, SortOrder};
pub use storage::StorageApi;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend rejected the request.
    #[error("Backend error {status}{}: {message}", code_suffix(.code))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Backend error code (e.g. `23505`, `PGRST116`, `invalid_credentials`).
        code: Option<String>,
        /// Human-readable message from the backend.
        message: String,
    },

    /// Missing, expired, or insufficient credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// An update or delete was issued without a row filter.
    #[error("Refusing to {0} without a filter")]
    MissingFilter(&'static str),
}

impl BackendError {
    /// Returns `true` if the backend refused the caller's credentials.
    ///
    /// Password sign-in answers bad credentials with `400`, so that status
    /// counts too.
    #[must_use]
    pub const fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_) | Self::Api { status: 400, .. }
        )
    }
}

#[allow(clippy::ref_option)]
fn code_suffix(code: &Option<String>) -> String {
    code.as_ref().map(|code| format!(" ({code})")).unwrap_or_default()
}

/// Shorthand for backend results.
pub type Result<T, E = BackendError> = std::result::Result<T, E>;
