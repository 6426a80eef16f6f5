//! Per-request layout data.
//!
//! Every page renders inside the same shell: a header with the category menu
//! and the visitor's account link. [`Page`] gathers that data before the
//! handler runs.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;
use verdant_market_backend::SupabaseClient;
use verdant_market_core::{AuthUser, Category};

use crate::db;
use crate::middleware::resolve_visitor;
use crate::state::AppState;

/// Data every page template needs for the shared shell.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// The signed-in user, if any.
    pub user: Option<AuthUser>,
    /// All categories, ordered by name.
    pub categories: Vec<Category>,
}

impl Layout {
    /// Name to show in the header for the signed-in user.
    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().map(AuthUser::display_name)
    }
}

/// Extractor: the primed layout plus a backend client for the visitor.
///
/// The user lookup and the category query run concurrently. Either one
/// failing leaves its half empty; the page still renders.
#[derive(Debug, Clone)]
pub struct Page {
    pub layout: Layout,
    /// Bound to the visitor's token when signed in.
    pub backend: SupabaseClient,
}

impl Page {
    /// Prime the layout for a request.
    pub async fn prime(state: &AppState, session: Option<&Session>) -> Self {
        let (visitor, categories) = tokio::join!(
            resolve_visitor(state, session),
            db::categories::list_categories(state.supabase()),
        );

        Self {
            layout: Layout {
                user: visitor.user,
                categories,
            },
            backend: visitor.client,
        }
    }
}

impl FromRequestParts<AppState> for Page {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().cloned();
        Ok(Self::prime(state, session.as_ref()).await)
    }
}
