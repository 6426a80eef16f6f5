//! Admin sign-in.
//!
//! Admins are ordinary backend auth users whose email is on the configured
//! allow-list. The password check runs against the backend with the anon key;
//! the resulting tokens are discarded because admin data access uses the
//! service-role client.

use thiserror::Error;
use tracing::instrument;
use verdant_market_backend::{BackendError, SupabaseClient};
use verdant_market_core::{Email, EmailError};

use crate::config::AdminConfig;
use crate::models::CurrentAdmin;

/// Errors that can occur during admin sign-in.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Email or password rejected by the backend.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Signed in, but not an admin.
    #[error("{0} is not an admin")]
    NotAllowed(Email),

    /// Backend error.
    #[error("backend error: {0}")]
    Backend(BackendError),
}

impl From<BackendError> for AdminAuthError {
    fn from(err: BackendError) -> Self {
        if err.is_auth_rejection() {
            Self::InvalidCredentials
        } else {
            Self::Backend(err)
        }
    }
}

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    client: &'a SupabaseClient,
    config: &'a AdminConfig,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service over the anon client.
    #[must_use]
    pub const fn new(client: &'a SupabaseClient, config: &'a AdminConfig) -> Self {
        Self { client, config }
    }

    /// Check the credentials and the allow-list.
    ///
    /// The allow-list is checked before the backend is called so unknown
    /// addresses never reach the password endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::NotAllowed` for emails outside the allow-list,
    /// `AdminAuthError::InvalidCredentials` if the backend rejects the
    /// password, or `AdminAuthError::Backend` if the backend is unreachable.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<CurrentAdmin, AdminAuthError> {
        let email = Email::parse(email)?;
        if !self.config.is_admin_email(&email) {
            return Err(AdminAuthError::NotAllowed(email));
        }

        let session = self
            .client
            .auth()
            .sign_in_with_password(email.as_str(), password)
            .await?;

        tracing::info!(user_id = %session.user.id, "Admin signed in");
        Ok(CurrentAdmin::new(&session.user, email))
    }
}
