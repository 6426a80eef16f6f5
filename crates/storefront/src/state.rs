//! Application state shared across handlers.

use std::sync::Arc;

use verdant_market_backend::{BackendError, SupabaseClient};

use crate::config::StorefrontConfig;
use crate::db::content::HeroSlideCache;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    supabase: SupabaseClient,
    hero_slides: HeroSlideCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL is invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, BackendError> {
        let supabase =
            SupabaseClient::new(&config.supabase.url, config.supabase.anon_key.clone())?;

        Ok(Self::with_client(config, supabase))
    }

    /// Create state around an existing backend client.
    #[must_use]
    pub fn with_client(config: StorefrontConfig, supabase: SupabaseClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                supabase,
                hero_slides: HeroSlideCache::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The anonymous backend client.
    ///
    /// Handlers serving a signed-in visitor should use the
    /// [`Page`](crate::layout::Page) extractor instead.
    #[must_use]
    pub fn supabase(&self) -> &SupabaseClient {
        &self.inner.supabase
    }

    /// The hero slide cache.
    #[must_use]
    pub fn hero_slides(&self) -> &HeroSlideCache {
        &self.inner.hero_slides
    }
}
