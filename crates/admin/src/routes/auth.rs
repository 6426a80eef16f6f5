//! Authentication route handlers for admin.
//!
//! Email and password are checked by the backend; only allow-listed emails
//! get an admin session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{products::LIST_PATH, render};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::services::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password.";
const SIGN_IN_UNAVAILABLE: &str = "Sign-in is unavailable right now. Please try again.";

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    email: String,
    error: Option<&'static str>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to(LIST_PATH).into_response();
    }
    LoginPageTemplate {
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Sign in.
///
/// POST /auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let service = AdminAuthService::new(state.auth_client(), state.config());

    match service.sign_in(&form.email, &form.password).await {
        Ok(admin) => {
            // New session id on privilege change
            session.cycle_id().await?;
            set_current_admin(&session, &admin).await?;
            set_sentry_user(&admin.id, Some(admin.email.as_str()));
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(e) => {
            let (status, error) = match &e {
                AdminAuthError::Backend(_) => {
                    tracing::error!("Admin sign-in failed: {e}");
                    (StatusCode::SERVICE_UNAVAILABLE, SIGN_IN_UNAVAILABLE)
                }
                _ => {
                    tracing::warn!("Admin sign-in refused: {e}");
                    (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS)
                }
            };
            let page = LoginPageTemplate {
                email: form.email,
                error: Some(error),
            };
            Ok((status, render(&page)).into_response())
        }
    }
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!("Failed to clear admin session: {e}");
    }
    clear_sentry_user();

    Redirect::to("/auth/login")
}
