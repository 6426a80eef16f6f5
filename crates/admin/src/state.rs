//! Application state shared across handlers.

use std::sync::Arc;

use verdant_market_backend::{BackendError, SupabaseClient};

use crate::config::AdminConfig;

/// Application state shared across all handlers.
///
/// Holds two backend clients: the service-role client for product data and
/// storage, and an anon client for password sign-in, so admin logins go
/// through the same auth path as everyone else.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    service: SupabaseClient,
    auth: SupabaseClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL is invalid.
    pub fn new(config: AdminConfig) -> Result<Self, BackendError> {
        let service = SupabaseClient::new(
            &config.supabase.url,
            config.supabase.service_role_key.clone(),
        )?;
        let auth = SupabaseClient::new(&config.supabase.url, config.supabase.anon_key.clone())?;

        Ok(Self::with_clients(config, service, auth))
    }

    /// Create state around existing backend clients.
    #[must_use]
    pub fn with_clients(config: AdminConfig, service: SupabaseClient, auth: SupabaseClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                service,
                auth,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The service-role backend client (HIGH PRIVILEGE).
    #[must_use]
    pub fn backend(&self) -> &SupabaseClient {
        &self.inner.service
    }

    /// The anon backend client used for sign-in.
    #[must_use]
    pub fn auth_client(&self) -> &SupabaseClient {
        &self.inner.auth
    }
}
