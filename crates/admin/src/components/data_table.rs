//! Data table component types.
//!
//! These types define the configuration for reusable data tables in the admin panel.

use serde::{Deserialize, Serialize};

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Hide the label visually (still read by screen readers).
    pub sr_only: bool,
    /// Right-align cells (numbers, actions).
    pub align_end: bool,
}

impl TableColumn {
    /// Create a new column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sr_only: false,
            align_end: false,
        }
    }

    /// Hide the header label visually.
    #[must_use]
    pub const fn sr_only(mut self) -> Self {
        self.sr_only = true;
        self
    }

    /// Right-align the column.
    #[must_use]
    pub const fn align_end(mut self) -> Self {
        self.align_end = true;
        self
    }
}

/// Header action (e.g. "Add Product") shown above the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableAction {
    /// Display label.
    pub label: String,
    /// Link target.
    pub href: String,
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Primary action above the table.
    pub action: Option<TableAction>,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            action: None,
            empty_title: "No items found".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set the header action.
    #[must_use]
    pub fn action(mut self, label: &str, href: &str) -> Self {
        self.action = Some(TableAction {
            label: label.to_string(),
            href: href.to_string(),
        });
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, title: &str, description: Option<&str>) -> Self {
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Number of columns, for empty-state `colspan`.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Build the products table configuration.
#[must_use]
pub fn products_table_config() -> DataTableConfig {
    DataTableConfig::new("products")
        .column(TableColumn::new("image", "Image").sr_only())
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("category", "Category"))
        .column(TableColumn::new("price", "Price").align_end())
        .column(TableColumn::new("actions", "Actions").sr_only().align_end())
        .action("Add Product", "/admin/products/add")
        .empty_state(
            "No products found",
            Some("Add your first product to get started."),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_table_columns() {
        let config = products_table_config();
        let keys: Vec<_> = config.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["image", "name", "category", "price", "actions"]);
        assert_eq!(config.column_count(), 5);
    }

    #[test]
    fn test_products_table_add_action() {
        let action = products_table_config().action.expect("add action");
        assert_eq!(action.label, "Add Product");
        assert_eq!(action.href, "/admin/products/add");
    }
}
