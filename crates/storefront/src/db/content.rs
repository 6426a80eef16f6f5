//! Home page merchandising content.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};
use verdant_market_backend::{SortOrder, SupabaseClient};
use verdant_market_core::HeroSlide;

/// How long hero slides are served from memory.
const HERO_SLIDE_TTL: Duration = Duration::from_secs(300);

/// In-memory cache of the active hero slides (5 minute TTL).
#[derive(Clone)]
pub struct HeroSlideCache {
    inner: Cache<(), Arc<Vec<HeroSlide>>>,
}

impl HeroSlideCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(1)
                .time_to_live(HERO_SLIDE_TTL)
                .build(),
        }
    }

    /// Drop the cached slides so the next request refetches them.
    pub async fn invalidate(&self) {
        self.inner.invalidate(&()).await;
    }
}

impl Default for HeroSlideCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Active hero slides in display order.
///
/// Served from cache when fresh. A failed fetch yields no slides and is not
/// cached, so the next request tries again.
#[instrument(skip_all)]
pub async fn active_hero_slides(client: &SupabaseClient, cache: &HeroSlideCache) -> Arc<Vec<HeroSlide>> {
    if let Some(slides) = cache.inner.get(&()).await {
        debug!("Cache hit for hero slides");
        return slides;
    }

    match client
        .from("hero_slides")
        .select("*")
        .eq("is_active", true)
        .order("sort_order", SortOrder::Ascending)
        .execute::<HeroSlide>()
        .await
    {
        Ok(slides) => {
            let slides = Arc::new(slides);
            cache.inner.insert((), Arc::clone(&slides)).await;
            slides
        }
        Err(e) => {
            tracing::error!("Error fetching hero slides: {e}");
            Arc::new(Vec::new())
        }
    }
}
