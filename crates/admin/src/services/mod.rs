//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Password sign-in restricted to the admin allow-list
//! - `products` - Product create/update/delete actions with image upload

pub mod auth;
pub mod products;

pub use auth::{AdminAuthError, AdminAuthService};
pub use products::{ImageFile, MAX_IMAGE_BYTES, ProductService, ProductSubmission};
