//! Shared HTTP plumbing for the backend client.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::auth::AuthApi;
use crate::query::QueryBuilder;
use crate::storage::StorageApi;
use crate::{BackendError, Result};

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for the backend's REST, auth and storage APIs.
///
/// Build one at start-up and clone it freely; clones share the connection
/// pool. Requests authenticate with the project key unless a user's access
/// token has been bound with [`with_access_token`](Self::with_access_token).
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<ClientInner>,
    access_token: Option<Arc<SecretString>>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("user_bound", &self.access_token.is_some())
            .finish()
    }
}

impl SupabaseClient {
    /// Create a client for the project at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // `Url::join` replaces the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                base_url,
                api_key,
            }),
            access_token: None,
        })
    }

    /// A clone of this client that sends `access_token` as the bearer token.
    ///
    /// Row-level security then evaluates queries as that user.
    #[must_use]
    pub fn with_access_token(&self, access_token: SecretString) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            access_token: Some(Arc::new(access_token)),
        }
    }

    /// Returns `true` if a user's access token is bound.
    #[must_use]
    pub const fn is_user_bound(&self) -> bool {
        self.access_token.is_some()
    }

    /// The project URL, always with a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Start a query against a table.
    #[must_use]
    pub fn from(&self, table: &str) -> QueryBuilder<'_> {
        QueryBuilder::new(self, table)
    }

    /// The auth API.
    #[must_use]
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// The storage API.
    #[must_use]
    pub const fn storage(&self) -> StorageApi<'_> {
        StorageApi::new(self)
    }

    /// Check that the backend answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the auth health endpoint is unreachable or
    /// unhealthy.
    pub async fn ping(&self) -> Result<()> {
        let url = self.endpoint("auth/v1/health")?;
        self.send(self.request(Method::GET, url)).await.map(drop)
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Resolve a path relative to the project URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// A request carrying the project key and the bound bearer token.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.inner.api_key);
        self.request_with_token(method, url, bearer)
    }

    /// A request carrying the project key and an explicit bearer token.
    pub(crate) fn request_with_token(
        &self,
        method: Method,
        url: Url,
        bearer: &SecretString,
    ) -> RequestBuilder {
        self.inner
            .http
            .request(method, url)
            .header("apikey", self.inner.api_key.expose_secret())
            .bearer_auth(bearer.expose_secret())
    }

    /// Send a request and parse a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request).await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body, 500),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    /// Send a request and return the body text of a successful response.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        tracing::error!(
            status = %status,
            body = %truncate(&body, 500),
            "Backend returned non-success status"
        );

        let (code, message) = parse_error_body(&body, status);
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized(message),
            StatusCode::NOT_FOUND => BackendError::NotFound(message),
            _ => BackendError::Api {
                status: status.as_u16(),
                code,
                message,
            },
        })
    }
}

/// Pull a code and a message out of an error body.
///
/// The three APIs disagree on shape:
/// - REST: `{ "code": "PGRST116", "message": "...", "details": ..., "hint": ... }`
/// - auth: `{ "code": 400, "error_code": "invalid_credentials", "msg": "..." }`,
///   or the older `{ "error": "invalid_grant", "error_description": "..." }`
/// - storage: `{ "statusCode": "400", "error": "Duplicate", "message": "..." }`
fn parse_error_body(body: &str, status: StatusCode) -> (Option<String>, String) {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    };

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        let message = if body.trim().is_empty() {
            fallback()
        } else {
            truncate(body, 200)
        };
        return (None, message);
    };

    let field = |key: &str| match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let message = field("message")
        .or_else(|| field("msg"))
        .or_else(|| field("error_description"))
        .or_else(|| field("error"))
        .unwrap_or_else(fallback);
    let code = field("error_code")
        .or_else(|| field("code"))
        .or_else(|| field("error"))
        .filter(|code| *code != message);

    (code, message)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
