//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers (frame denial, no sniffing)
//! 4. Session layer (tower-sessions with in-memory store)
//! 5. Auth guard (`RequireAdminAuth` extractor on protected routes)

pub mod auth;
pub mod session;

pub use auth::{
    AdminAuthRejection, OptionalAdminAuth, RequireAdminAuth, clear_current_admin,
    set_current_admin,
};
pub use session::{create_session_layer, set_flash, take_flash};
