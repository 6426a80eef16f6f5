//! Page data access.
//!
//! Each function runs one backend query for one page section. Read failures
//! are logged and masked behind an empty result so a page always renders.

pub mod categories;
pub mod content;
pub mod products;
pub mod reviews;
