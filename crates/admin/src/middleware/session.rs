//! Session middleware configuration for admin.
//!
//! In-memory sessions with stricter security settings than the storefront
//! (SameSite=Strict, 24hr expiry). A restart signs every admin out.

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::components::toast::Toast;
use crate::config::AdminConfig;
use crate::models::session_keys;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "vm_admin_session";

/// Session expiry time in seconds (24 hours - stricter than storefront).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        // SameSite=Strict for admin (stricter than storefront's Lax)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}

/// Queue a toast for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(session: &Session, toast: &Toast) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, toast).await
}

/// Take the queued toast, if any. Read failures are logged and dropped.
pub async fn take_flash(session: &Session) -> Option<Toast> {
    match session.remove::<Toast>(session_keys::FLASH).await {
        Ok(toast) => toast,
        Err(e) => {
            tracing::warn!("Failed to read flash message: {e}");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_flash_is_shown_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        set_flash(&session, &Toast::success("Product added successfully."))
            .await
            .unwrap();

        let toast = take_flash(&session).await.unwrap();
        assert_eq!(toast.title, "Success!");
        assert_eq!(toast.description, "Product added successfully.");
        assert!(take_flash(&session).await.is_none());
    }
}
