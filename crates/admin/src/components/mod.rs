//! Reusable UI components.
//!
//! Components are plain structs the templates render; handlers build them and
//! drive their state.

pub mod data_table;
pub mod product_form;
pub mod toast;

pub use data_table::{DataTableConfig, products_table_config};
pub use product_form::{FormMode, FormOutcome, ProductForm, ProductFormValues, SubmitInFlight};
pub use toast::{Toast, ToastVariant};
