//! Core types for Verdant Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod form;
pub mod id;
pub mod images;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use form::{ActionResult, FieldErrors, RequestState};
pub use id::*;
pub use images::ImageUrls;
pub use price::{Price, PriceError};
pub use status::OrderStatus;
