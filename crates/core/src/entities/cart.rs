//! Cart lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;
use crate::types::Price;

/// A product and how many of it the shopper wants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::new(self.product.price.amount() * Decimal::from(self.quantity))
    }
}
