//! Status enums for backend rows.

use serde::{Deserialize, Serialize};

/// Order lifecycle status as stored in the `orders.status` column.
///
/// Values the backend adds later deserialize as [`OrderStatus::Unknown`]
/// rather than failing the whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_values() {
        let shipped: OrderStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(shipped, OrderStatus::Shipped);

        let odd: OrderStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(odd, OrderStatus::Unknown);
    }
}
