//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};
use verdant_market_core::{AuthUser, Email, UserId};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
/// Admin data access uses the service-role client, so no backend token is
/// kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Backend auth user ID.
    pub id: UserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
}

impl CurrentAdmin {
    /// Build the session identity for a signed-in backend user.
    #[must_use]
    pub fn new(user: &AuthUser, email: Email) -> Self {
        Self {
            id: user.id,
            name: user.display_name().to_string(),
            email,
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for a toast to show on the next page render.
    pub const FLASH: &str = "flash";
}
