//! Verdant Market Core - Shared types library.
//!
//! This crate provides common types used across all Verdant Market components:
//! - `storefront` - Public-facing shop
//! - `admin` - Product administration console
//! - `backend` - Client for the hosted backend (REST tables, auth, storage)
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! Entity types mirror the backend table schemas; everything is created and
//! mutated in the backend, these are the shapes we read and write.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, product image lists, form results
//! - [`entities`] - Table row types (products, categories, orders, reviews, ...)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod entities;
pub mod types;

pub use entities::*;
pub use types::*;
