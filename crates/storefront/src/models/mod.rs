//! Session-stored models for the storefront.

pub mod session;

pub use session::{AuthTokens, keys as session_keys};
