//! Session-related types.
//!
//! Types stored in the session for authentication state.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use verdant_market_backend::AuthSession;

/// Backend tokens for the signed-in visitor.
///
/// Only the tokens live in the session. The user record itself is looked up
/// from the backend on each request, so a revoked session signs the visitor
/// out on their next page view. An expired access token is exchanged once
/// for a fresh pair using the refresh token.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    access_token: String,
    refresh_token: String,
}

impl AuthTokens {
    /// Wrap raw tokens.
    #[must_use]
    pub fn new(access_token: &str, refresh_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
        }
    }

    /// Tokens from a sign-in or refresh.
    #[must_use]
    pub fn from_session(session: &AuthSession) -> Self {
        Self::new(
            session.access_token.expose_secret(),
            session.refresh_token.expose_secret(),
        )
    }

    /// The access token, for binding to a backend client.
    #[must_use]
    pub fn access_token(&self) -> SecretString {
        SecretString::from(self.access_token.as_str())
    }

    /// The refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> SecretString {
        SecretString::from(self.refresh_token.as_str())
    }
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the signed-in visitor's backend tokens.
    pub const AUTH_TOKENS: &str = "auth_tokens";
}
