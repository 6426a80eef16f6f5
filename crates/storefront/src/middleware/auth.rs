//! Visitor authentication.
//!
//! The session holds backend tokens; [`resolve_visitor`] turns them into the
//! signed-in user and a backend client bound to that user's token.

use tower_sessions::Session;
use verdant_market_backend::SupabaseClient;
use verdant_market_core::AuthUser;

use crate::models::{AuthTokens, session_keys};
use crate::state::AppState;

/// Who is making the request, and the backend client to serve them with.
#[derive(Debug, Clone)]
pub struct Visitor {
    /// The signed-in user, if any.
    pub user: Option<AuthUser>,
    /// Bound to the user's access token when signed in, anonymous otherwise.
    pub client: SupabaseClient,
}

impl Visitor {
    fn anonymous(state: &AppState) -> Self {
        Self {
            user: None,
            client: state.supabase().clone(),
        }
    }
}

/// Resolve the visitor from the session.
///
/// Never fails: a missing session, an unknown token or a backend error all
/// yield an anonymous visitor. An expired access token is refreshed once and
/// the new tokens written back to the session.
pub async fn resolve_visitor(state: &AppState, session: Option<&Session>) -> Visitor {
    let Some(session) = session else {
        return Visitor::anonymous(state);
    };

    let tokens = match session.get::<AuthTokens>(session_keys::AUTH_TOKENS).await {
        Ok(Some(tokens)) => tokens,
        Ok(None) => return Visitor::anonymous(state),
        Err(e) => {
            tracing::warn!("Failed to read session: {e}");
            return Visitor::anonymous(state);
        }
    };

    let access_token = tokens.access_token();
    match state.supabase().auth().get_user(&access_token).await {
        Ok(Some(user)) => Visitor {
            user: Some(user),
            client: state.supabase().with_access_token(access_token),
        },
        Ok(None) => refresh(state, session, &tokens).await,
        Err(e) => {
            tracing::error!("Failed to look up signed-in user: {e}");
            Visitor::anonymous(state)
        }
    }
}

async fn refresh(state: &AppState, session: &Session, tokens: &AuthTokens) -> Visitor {
    match state
        .supabase()
        .auth()
        .refresh_session(&tokens.refresh_token())
        .await
    {
        Ok(fresh) => {
            if let Err(e) = set_auth_tokens(session, &AuthTokens::from_session(&fresh)).await {
                tracing::warn!("Failed to store refreshed tokens: {e}");
            }
            Visitor {
                user: Some(fresh.user),
                client: state.supabase().with_access_token(fresh.access_token),
            }
        }
        Err(e) => {
            tracing::debug!("Session could not be refreshed: {e}");
            if let Err(e) = clear_auth_tokens(session).await {
                tracing::warn!("Failed to clear expired session: {e}");
            }
            Visitor::anonymous(state)
        }
    }
}

/// Store backend tokens in the session after sign-in.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_auth_tokens(
    session: &Session,
    tokens: &AuthTokens,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_TOKENS, tokens).await
}

/// Remove backend tokens from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_auth_tokens(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AuthTokens>(session_keys::AUTH_TOKENS)
        .await?;
    Ok(())
}
