//! Backend table row types.
//!
//! Each type mirrors one table (or one embedded join) as the REST API returns
//! it. Nullable text columns deserialize to empty strings where the pages
//! treat "missing" and "blank" alike.

pub mod account;
pub mod cart;
pub mod category;
pub mod content;
pub mod order;
pub mod product;
pub mod review;

pub use account::{AuthUser, UserProfile};
pub use cart::CartItem;
pub use category::{Category, CategoryName};
pub use content::{HeroSlide, Wishlist};
pub use order::{Address, Order, OrderItem};
pub use product::{Product, ProductListRow, ProductRecord};
pub use review::{Review, ReviewAuthor, ReviewWithAuthor};

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
