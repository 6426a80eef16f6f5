//! Backend data access for admin.
//!
//! All queries run with the service-role client, so row-level security does
//! not apply. Repositories return errors; [`products::list_products`] is the
//! one read that masks failures behind an empty list.
//!
//! ## Tables
//!
//! - `products` - Catalogue rows (`image_url` holds a JSON array of URLs)
//! - `categories` - Category names for the product form

pub mod categories;
pub mod products;

pub use categories::CategoryRepository;
pub use products::ProductRepository;
