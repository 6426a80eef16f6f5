//! Product form component.
//!
//! Holds everything the product form template renders: the field values, the
//! category options, the current images, the last [`ActionResult`] and the
//! [`RequestState`] of the submission.
//!
//! Each post renders a fresh form, so the pending phase lives in the browser:
//! the template's `data-single-flight` script disables the submit control and
//! swaps in [`ProductForm::pending_label`] until the response arrives.
//!
//! ```text
//! Idle --begin_submit--> Pending --settle(ok)--> Succeeded
//!                           |  \--settle(err)--> Failed
//!                           \--begin_submit--> rejected (single flight)
//! ```

use thiserror::Error;
use verdant_market_core::{ActionResult, Category, ImageUrls, Product, ProductId, RequestState};

use super::toast::Toast;

/// Where a successful create sends the admin.
pub const PRODUCT_LIST_PATH: &str = "/admin/products";

/// Whether the form creates a product or edits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ProductId),
}

impl FormMode {
    /// Returns `true` when editing an existing product.
    #[must_use]
    pub const fn is_editing(self) -> bool {
        matches!(self, Self::Edit(_))
    }

    /// The URL the form posts to.
    #[must_use]
    pub fn action_url(self) -> String {
        match self {
            Self::Create => "/admin/products/add".to_string(),
            Self::Edit(id) => format!("/admin/products/{id}/edit"),
        }
    }
}

/// Raw field values, as typed or as loaded from the product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFormValues {
    pub name: String,
    pub price: String,
    pub description: String,
    pub long_description: String,
    pub category_id: String,
    pub data_ai_hint: String,
    pub is_featured: bool,
    pub is_best_seller: bool,
    /// Hidden `image_url` field: the stored image list, edit mode only.
    pub image_url: Option<String>,
}

impl ProductFormValues {
    /// Values for editing an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_input_value(),
            description: product.description.clone(),
            long_description: product.long_description.clone(),
            category_id: product
                .category_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            data_ai_hint: product.data_ai_hint.clone(),
            is_featured: product.is_featured,
            is_best_seller: product.is_best_seller,
            image_url: Some(
                product
                    .image_url
                    .clone()
                    .filter(|raw| !raw.is_empty())
                    .unwrap_or_else(|| "[]".to_string()),
            ),
        }
    }
}

/// A submit arrived while the previous one was still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a submission is already in progress")]
pub struct SubmitInFlight;

/// What the page should do once a submission settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOutcome {
    /// Notification to show, if the result carried a message.
    pub toast: Option<Toast>,
    /// Page to navigate to, if any.
    pub navigate_to: Option<&'static str>,
}

/// The product form.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub mode: FormMode,
    pub values: ProductFormValues,
    pub categories: Vec<Category>,
    pub state: ActionResult,
    pub request: RequestState,
}

impl ProductForm {
    /// An empty form for adding a product.
    #[must_use]
    pub fn create(categories: Vec<Category>) -> Self {
        Self::with_values(FormMode::Create, ProductFormValues::default(), categories)
    }

    /// A form prefilled from an existing product.
    #[must_use]
    pub fn edit(product: &Product, categories: Vec<Category>) -> Self {
        Self::with_values(
            FormMode::Edit(product.id),
            ProductFormValues::from_product(product),
            categories,
        )
    }

    /// A form holding previously submitted values.
    #[must_use]
    pub fn with_values(mode: FormMode, values: ProductFormValues, categories: Vec<Category>) -> Self {
        Self {
            mode,
            values,
            categories,
            state: ActionResult::initial(),
            request: RequestState::Idle,
        }
    }

    /// Mark a submission as started.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitInFlight`] if a submission is already pending.
    pub fn begin_submit(&mut self) -> Result<(), SubmitInFlight> {
        if self.request.is_pending() {
            return Err(SubmitInFlight);
        }
        self.request = RequestState::Pending;
        Ok(())
    }

    /// Record the action's result and decide what happens next.
    ///
    /// Success shows a "Success!" toast and, when creating, navigates back to
    /// the product list. Failure shows a destructive "Error" toast and never
    /// navigates. An empty message shows nothing.
    pub fn settle(&mut self, result: ActionResult) -> FormOutcome {
        self.request = RequestState::settled(result.success);

        let toast = Toast::for_result(&result);
        let navigate_to =
            (result.success && !self.mode.is_editing()).then_some(PRODUCT_LIST_PATH);

        self.state = result;
        FormOutcome { toast, navigate_to }
    }

    /// The first error message for a field.
    #[must_use]
    pub fn error(&self, field: &str) -> Option<&str> {
        self.state.errors.first(field)
    }

    /// Returns `true` when editing an existing product.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.mode.is_editing()
    }

    /// The URL the form posts to.
    #[must_use]
    pub fn action_url(&self) -> String {
        self.mode.action_url()
    }

    /// Submit button label when idle.
    #[must_use]
    pub const fn idle_label(&self) -> &'static str {
        if self.is_editing() {
            "Update Product"
        } else {
            "Add Product"
        }
    }

    /// Submit button label while pending.
    #[must_use]
    pub const fn pending_label(&self) -> &'static str {
        if self.is_editing() {
            "Updating..."
        } else {
            "Adding..."
        }
    }

    /// The current images, parsed from the hidden field.
    #[must_use]
    pub fn current_images(&self) -> ImageUrls {
        ImageUrls::parse_opt(self.values.image_url.as_deref())
    }

    /// Returns `true` if the category option should be preselected.
    #[must_use]
    pub fn is_selected(&self, category: &Category) -> bool {
        self.values.category_id == category.id.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use verdant_market_core::FieldErrors;

    use super::*;

    fn product(image_url: Option<&str>) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "8c1f4a2e-5b6d-4e7f-8a9b-0c1d2e3f4a5b",
            "name": "Conference Pears",
            "price": "2.80",
            "description": "Crisp and sweet",
            "long_description": "Grown in Kent.",
            "category_id": "2f3e4d5c-6b7a-4980-a1b2-c3d4e5f60718",
            "image_url": image_url,
            "data_ai_hint": "pears",
            "is_featured": true,
            "is_best_seller": false
        }))
        .unwrap()
    }

    fn edit_form() -> ProductForm {
        ProductForm::edit(&product(None), vec![])
    }

    #[test]
    fn test_initial_state() {
        let form = ProductForm::create(vec![]);
        assert_eq!(form.state, ActionResult::initial());
        assert_eq!(form.request, RequestState::Idle);
        assert!(form.values.image_url.is_none());
    }

    #[test]
    fn test_edit_parses_stored_image_list() {
        let form = ProductForm::edit(&product(Some(r#"["https://a.test/1.webp","https://a.test/2.webp"]"#)), vec![]);
        assert_eq!(
            form.current_images().as_slice(),
            ["https://a.test/1.webp", "https://a.test/2.webp"]
        );
    }

    #[test]
    fn test_edit_falls_back_to_legacy_single_url() {
        let form = ProductForm::edit(&product(Some("https://a.test/legacy.jpg")), vec![]);
        assert_eq!(form.current_images().as_slice(), ["https://a.test/legacy.jpg"]);
    }

    #[test]
    fn test_edit_hidden_field_defaults_to_empty_array() {
        let form = edit_form();
        assert_eq!(form.values.image_url.as_deref(), Some("[]"));
        assert!(form.current_images().is_empty());
    }

    #[test]
    fn test_success_when_creating_navigates_to_list() {
        let mut form = ProductForm::create(vec![]);
        form.begin_submit().unwrap();
        let outcome = form.settle(ActionResult::succeeded("Product added successfully."));

        assert_eq!(outcome.navigate_to, Some("/admin/products"));
        let toast = outcome.toast.unwrap();
        assert_eq!(toast.title, "Success!");
        assert_eq!(toast.description, "Product added successfully.");
        assert!(!toast.is_destructive());
        assert_eq!(form.request, RequestState::Succeeded);
    }

    #[test]
    fn test_success_when_editing_stays_on_form() {
        let mut form = edit_form();
        form.begin_submit().unwrap();
        let outcome = form.settle(ActionResult::succeeded("Product updated successfully."));

        assert_eq!(outcome.navigate_to, None);
        assert_eq!(outcome.toast.unwrap().title, "Success!");
    }

    #[test]
    fn test_failure_never_navigates() {
        for mut form in [ProductForm::create(vec![]), edit_form()] {
            form.begin_submit().unwrap();
            let outcome = form.settle(ActionResult::failed("Failed to add product: boom"));

            assert_eq!(outcome.navigate_to, None);
            let toast = outcome.toast.unwrap();
            assert_eq!(toast.title, "Error");
            assert!(toast.is_destructive());
            assert_eq!(form.request, RequestState::Failed);
        }
    }

    #[test]
    fn test_empty_message_shows_no_toast() {
        let mut form = ProductForm::create(vec![]);
        form.begin_submit().unwrap();
        let outcome = form.settle(ActionResult::initial());
        assert!(outcome.toast.is_none());
    }

    #[test]
    fn test_field_renders_first_error_only() {
        let mut form = ProductForm::create(vec![]);
        form.begin_submit().unwrap();
        form.settle(ActionResult::invalid(
            "Please correct the errors below.",
            FieldErrors::new()
                .with("name", "Name is required")
                .with("name", "Name is too long"),
        ));

        assert_eq!(form.error("name"), Some("Name is required"));
        assert_eq!(form.error("price"), None);
    }

    #[test]
    fn test_second_submit_while_pending_is_rejected() {
        let mut form = ProductForm::create(vec![]);
        form.begin_submit().unwrap();
        assert!(form.request.is_pending());
        assert_eq!(form.begin_submit(), Err(SubmitInFlight));

        form.settle(ActionResult::failed("Error"));
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn test_labels() {
        let create = ProductForm::create(vec![]);
        assert_eq!(create.idle_label(), "Add Product");
        assert_eq!(create.pending_label(), "Adding...");

        let edit = edit_form();
        assert_eq!(edit.idle_label(), "Update Product");
        assert_eq!(edit.pending_label(), "Updating...");
    }

    #[test]
    fn test_action_urls() {
        assert_eq!(ProductForm::create(vec![]).action_url(), "/admin/products/add");
        assert_eq!(
            edit_form().action_url(),
            "/admin/products/8c1f4a2e-5b6d-4e7f-8a9b-0c1d2e3f4a5b/edit"
        );
    }
}
