//! Authentication route handlers.
//!
//! Email and password sign-in against the backend auth API. The session keeps
//! only the backend tokens; the user is looked up again on every request.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::layout::{Layout, Page};
use crate::middleware::{clear_auth_tokens, set_auth_tokens};
use crate::models::AuthTokens;
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub error: Option<String>,
}

/// Map an error code from the query string to a message.
fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "session" => "We couldn't sign you in. Please try again.",
        _ => "Something went wrong. Please try again.",
    }
}

/// Display the login page.
pub async fn login_page(page: Page, Query(query): Query<MessageQuery>) -> Response {
    if page.layout.user.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        layout: page.layout,
        error: query.error.as_deref().map(error_message).map(String::from),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state
        .supabase()
        .auth()
        .sign_in_with_password(form.email.trim(), &form.password)
        .await
    {
        Ok(auth) => {
            // New session id on privilege change
            if let Err(e) = session.cycle_id().await {
                tracing::error!("Failed to cycle session id: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }
            if let Err(e) = set_auth_tokens(&session, &AuthTokens::from_session(&auth)).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }

            set_sentry_user(&auth.user.id, auth.user.email.as_deref());
            tracing::info!(user_id = %auth.user.id, "Signed in");
            Redirect::to("/").into_response()
        }
        Err(e) if e.is_auth_rejection() => {
            tracing::warn!("Login failed: {e}");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!("Login request failed: {e}");
            Redirect::to("/auth/login?error=backend").into_response()
        }
    }
}

/// Handle logout.
///
/// Revokes the backend session (best effort) and clears local tokens.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(tokens)) = session
        .get::<AuthTokens>(crate::models::session_keys::AUTH_TOKENS)
        .await
        && let Err(e) = state.supabase().auth().sign_out(&tokens.access_token()).await
    {
        tracing::warn!("Failed to revoke backend session: {e}");
    }

    if let Err(e) = clear_auth_tokens(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();

    Redirect::to("/").into_response()
}
