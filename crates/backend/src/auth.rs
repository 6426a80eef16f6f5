//! Auth API (`/auth/v1`).

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;
use verdant_market_core::AuthUser;

use crate::client::SupabaseClient;
use crate::{BackendError, Result};

/// Tokens and user returned by a successful sign-in.
#[derive(Debug, Deserialize)]
pub struct AuthSession {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    /// Seconds until `access_token` expires.
    #[serde(default)]
    pub expires_in: u64,
    pub user: AuthUser,
}

/// Handle to the auth API, borrowed from a [`SupabaseClient`].
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a SupabaseClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) const fn new(client: &'a SupabaseClient) -> Self {
        Self { client }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error for bad credentials (see
    /// [`BackendError::is_auth_rejection`]) or if the request fails.
    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let mut url = self.client.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let request = self
            .client
            .request(Method::POST, url)
            .json(&serde_json::json!({ "email": email, "password": password }));
        self.client.send_json(request).await
    }

    /// Exchange a refresh token for a fresh session.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh token was already used or revoked, or
    /// if the request fails.
    #[instrument(skip_all)]
    pub async fn refresh_session(&self, refresh_token: &SecretString) -> Result<AuthSession> {
        let mut url = self.client.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "refresh_token");

        let request = self
            .client
            .request(Method::POST, url)
            .json(&serde_json::json!({ "refresh_token": refresh_token.expose_secret() }));
        self.client.send_json(request).await
    }

    /// Look up the user an access token belongs to.
    ///
    /// Returns `Ok(None)` when the token is expired, revoked or malformed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any other reason.
    #[instrument(skip_all)]
    pub async fn get_user(&self, access_token: &SecretString) -> Result<Option<AuthUser>> {
        let url = self.client.endpoint("auth/v1/user")?;
        let request = self
            .client
            .request_with_token(Method::GET, url, access_token);

        match self.client.send_json(request).await {
            Ok(user) => Ok(Some(user)),
            Err(BackendError::Unauthorized(_) | BackendError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Revoke the session an access token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. An already-invalid token is not
    /// an error.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, access_token: &SecretString) -> Result<()> {
        let url = self.client.endpoint("auth/v1/logout")?;
        let request = self
            .client
            .request_with_token(Method::POST, url, access_token);

        match self.client.send(request).await {
            Ok(_) | Err(BackendError::Unauthorized(_) | BackendError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
