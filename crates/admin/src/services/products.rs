//! Product server actions.
//!
//! Each action takes a [`ProductSubmission`] and answers with an
//! [`ActionResult`] the form renders: field errors and a toast message.
//! Nothing here returns `Err`; every failure becomes a message.
//!
//! Submission flow:
//!
//! 1. Validate the text fields and the selected files.
//! 2. Upload each file to the product image bucket.
//! 3. Reconcile the image list (new uploads replace the old list).
//! 4. Write the `products` row.

use tracing::instrument;
use uuid::Uuid;
use verdant_market_backend::{BackendError, SupabaseClient};
use verdant_market_core::{
    ActionResult, CategoryId, FieldErrors, ImageUrls, Price, PriceError, ProductId, ProductRecord,
};

use crate::components::ProductFormValues;
use crate::db::ProductRepository;

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Folder inside the bucket that product images are written to.
const UPLOAD_FOLDER: &str = "products";

/// Accepted image extensions and the content type each is stored with.
const IMAGE_TYPES: [(&str, &str); 4] = [
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
];

const INVALID_FORM: &str = "Please correct the errors below.";

/// One `image_file` part of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// A file input with nothing chosen still posts an empty part.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lower-cased extension of the file name.
    fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Content type to store the file with, if it is an accepted image.
    ///
    /// The extension decides; a declared content type that contradicts it is
    /// rejected.
    fn image_content_type(&self) -> Option<&'static str> {
        let ext = self.extension()?;
        let &(_, content_type) = IMAGE_TYPES.iter().find(|(e, _)| *e == ext)?;
        match self.content_type.as_deref() {
            None | Some("" | "application/octet-stream") => Some(content_type),
            Some(declared) if declared.eq_ignore_ascii_case(content_type) => Some(content_type),
            Some(_) => None,
        }
    }

    /// Object path for this upload: `products/<uuid>-<sanitised name>`.
    fn storage_path(&self) -> String {
        format!(
            "{UPLOAD_FOLDER}/{}-{}",
            Uuid::new_v4(),
            sanitize_file_name(&self.file_name)
        )
    }
}

/// A submitted product form: the raw field values plus the chosen files.
#[derive(Debug, Clone, Default)]
pub struct ProductSubmission {
    pub values: ProductFormValues,
    pub files: Vec<ImageFile>,
}

impl ProductSubmission {
    /// Files that were actually chosen.
    fn chosen_files(&self) -> impl Iterator<Item = &ImageFile> {
        self.files.iter().filter(|file| !file.is_empty())
    }
}

/// Field values that passed validation.
struct ValidatedProduct {
    name: String,
    price: Price,
    description: String,
    long_description: String,
    category_id: CategoryId,
    data_ai_hint: String,
    is_featured: bool,
    is_best_seller: bool,
    existing_images: ImageUrls,
}

impl ValidatedProduct {
    fn into_record(self, images: &ImageUrls) -> ProductRecord {
        ProductRecord {
            name: self.name,
            price: self.price,
            description: self.description,
            long_description: self.long_description,
            category_id: self.category_id,
            image_url: images.to_json(),
            data_ai_hint: self.data_ai_hint,
            is_featured: self.is_featured,
            is_best_seller: self.is_best_seller,
        }
    }
}

/// Product write service.
pub struct ProductService<'a> {
    client: &'a SupabaseClient,
    products: ProductRepository<'a>,
    bucket: &'a str,
}

impl<'a> ProductService<'a> {
    /// Create a product service over the service-role client.
    #[must_use]
    pub const fn new(client: &'a SupabaseClient, bucket: &'a str) -> Self {
        Self {
            client,
            products: ProductRepository::new(client),
            bucket,
        }
    }

    /// Create a product.
    #[instrument(skip_all, fields(name = %submission.values.name))]
    pub async fn add_product(&self, submission: &ProductSubmission) -> ActionResult {
        let product = match validate(submission) {
            Ok(product) => product,
            Err(errors) => return ActionResult::invalid(INVALID_FORM, errors),
        };
        let images = match self.reconcile_images(submission, product.existing_images.clone()).await {
            Ok(images) => images,
            Err(result) => return result,
        };

        match self.products.insert(&product.into_record(&images)).await {
            Ok(created) => {
                tracing::info!(product_id = %created.id, "Product added");
                ActionResult::succeeded("Product added successfully.")
            }
            Err(e) => {
                tracing::error!("Failed to add product: {e}");
                ActionResult::failed(format!("Failed to add product: {}", describe(&e)))
            }
        }
    }

    /// Replace an existing product's fields.
    ///
    /// With no files chosen the image list from the hidden `image_url` field
    /// is written back unchanged; chosen files replace it.
    #[instrument(skip(self, submission))]
    pub async fn update_product(&self, id: ProductId, submission: &ProductSubmission) -> ActionResult {
        let product = match validate(submission) {
            Ok(product) => product,
            Err(errors) => return ActionResult::invalid(INVALID_FORM, errors),
        };
        let images = match self.reconcile_images(submission, product.existing_images.clone()).await {
            Ok(images) => images,
            Err(result) => return result,
        };

        match self.products.update(id, &product.into_record(&images)).await {
            Ok(_) => {
                tracing::info!(product_id = %id, "Product updated");
                ActionResult::succeeded("Product updated successfully.")
            }
            Err(e) => {
                tracing::error!("Failed to update product: {e}");
                ActionResult::failed(format!("Failed to update product: {}", describe(&e)))
            }
        }
    }

    /// Delete a product. Its stored images are left in the bucket.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> ActionResult {
        match self.products.delete(id).await {
            Ok(()) => {
                tracing::info!(product_id = %id, "Product deleted");
                ActionResult::succeeded("Product deleted successfully.")
            }
            Err(e) => {
                tracing::error!("Failed to delete product: {e}");
                ActionResult::failed(format!("Failed to delete product: {}", describe(&e)))
            }
        }
    }

    /// Upload the chosen files and decide the image list to store.
    async fn reconcile_images(
        &self,
        submission: &ProductSubmission,
        existing: ImageUrls,
    ) -> Result<ImageUrls, ActionResult> {
        let mut uploaded = Vec::new();
        for file in submission.chosen_files() {
            // Validated already
            let Some(content_type) = file.image_content_type() else {
                continue;
            };
            let path = file.storage_path();
            match self
                .client
                .storage()
                .upload(self.bucket, &path, file.bytes.clone(), content_type)
                .await
            {
                Ok(url) => uploaded.push(url.to_string()),
                Err(e) => {
                    tracing::error!(path = %path, "Failed to upload image: {e}");
                    return Err(ActionResult::failed(format!(
                        "Failed to upload image: {}",
                        describe(&e)
                    )));
                }
            }
        }

        Ok(existing.replace_with_uploads(uploaded))
    }
}

/// Check every field, collecting all messages rather than stopping at the
/// first.
fn validate(submission: &ProductSubmission) -> Result<ValidatedProduct, FieldErrors> {
    let values = &submission.values;
    let mut errors = FieldErrors::new();

    let name = required(&mut errors, "name", &values.name, "Name is required");
    let description = required(
        &mut errors,
        "description",
        &values.description,
        "Description is required",
    );
    let long_description = required(
        &mut errors,
        "long_description",
        &values.long_description,
        "Long description is required",
    );
    let data_ai_hint = required(
        &mut errors,
        "data_ai_hint",
        &values.data_ai_hint,
        "AI hint is required",
    );

    let price = Price::parse(&values.price)
        .map_err(|e| errors.add("price", price_message(&e)))
        .ok();

    let category_id = match values.category_id.trim() {
        "" => {
            errors.add("category_id", "Category is required");
            None
        }
        raw => raw
            .parse::<CategoryId>()
            .map_err(|_| errors.add("category_id", "Invalid category"))
            .ok(),
    };

    for file in submission.chosen_files() {
        if file.image_content_type().is_none() {
            errors.add(
                "image_file",
                format!("{}: images must be PNG, JPG or WEBP files", file.file_name),
            );
        }
        if file.bytes.len() > MAX_IMAGE_BYTES {
            errors.add(
                "image_file",
                format!("{}: images must be 5 MB or smaller", file.file_name),
            );
        }
    }

    match (name, description, long_description, data_ai_hint, price, category_id) {
        (
            Some(name),
            Some(description),
            Some(long_description),
            Some(data_ai_hint),
            Some(price),
            Some(category_id),
        ) if errors.is_empty() => Ok(ValidatedProduct {
            name,
            price,
            description,
            long_description,
            category_id,
            data_ai_hint,
            is_featured: values.is_featured,
            is_best_seller: values.is_best_seller,
            existing_images: ImageUrls::parse_opt(values.image_url.as_deref()),
        }),
        _ => Err(errors),
    }
}

fn required(errors: &mut FieldErrors, field: &str, value: &str, message: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, message);
        None
    } else {
        Some(value.to_string())
    }
}

fn price_message(err: &PriceError) -> &'static str {
    match err {
        PriceError::Empty => "Price is required",
        PriceError::NotANumber => "Price must be a number",
        PriceError::NotPositive => "Price must be greater than zero",
        PriceError::TooPrecise => "Price can have at most two decimal places",
    }
}

/// The backend's own message where it gave one.
fn describe(err: &BackendError) -> String {
    match err {
        BackendError::Api { message, .. }
        | BackendError::Unauthorized(message)
        | BackendError::NotFound(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Reduce a client-supplied file name to `[a-z0-9._-]`.
fn sanitize_file_name(name: &str) -> String {
    // Browsers on Windows may send a full path
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            c @ ('a'..='z' | '0'..='9' | '.' | '_' | '-') => c,
            _ => '-',
        })
        .collect();
    let cleaned = cleaned.trim_start_matches(['.', '-']);
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum::routing::{delete, patch, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use crate::db::test_support::{stub_client, unreachable_client};

    const PEAR_ID: &str = "8c1f4a2e-5b6d-4e7f-8a9b-0c1d2e3f4a5b";
    const FRUIT_ID: &str = "2f3e4d5c-6b7a-4980-a1b2-c3d4e5f60718";
    const BUCKET: &str = "product-images";

    fn submission() -> ProductSubmission {
        ProductSubmission {
            values: ProductFormValues {
                name: "Conference Pears".to_string(),
                price: "2.80".to_string(),
                description: "Crisp and sweet".to_string(),
                long_description: "Grown in Kent.".to_string(),
                category_id: FRUIT_ID.to_string(),
                data_ai_hint: "pears".to_string(),
                is_featured: true,
                is_best_seller: false,
                image_url: None,
            },
            files: vec![],
        }
    }

    fn webp(name: &str) -> ImageFile {
        ImageFile {
            file_name: name.to_string(),
            content_type: Some("image/webp".to_string()),
            bytes: vec![0x52, 0x49, 0x46, 0x46],
        }
    }

    type Captured = Arc<Mutex<Option<Value>>>;

    /// A backend that accepts uploads and records the last written row.
    fn recording_backend(captured: &Captured) -> Router {
        let on_insert = Arc::clone(captured);
        let on_update = Arc::clone(captured);
        Router::new()
            .route(
                "/storage/v1/object/{*path}",
                post(|| async { Json(json!({ "Key": "ok" })) }),
            )
            .route(
                "/rest/v1/products",
                post(move |Json(body): Json<Value>| {
                    let captured = Arc::clone(&on_insert);
                    async move { Json(json!([stored_row(&captured, body)])) }
                })
                .patch(move |Json(body): Json<Value>| {
                    let captured = Arc::clone(&on_update);
                    async move { Json(json!([stored_row(&captured, body)])) }
                }),
            )
    }

    fn stored_row(captured: &Captured, body: Value) -> Value {
        *captured.lock().unwrap() = Some(body.clone());
        let mut row = body;
        row["id"] = json!(PEAR_ID);
        row
    }

    fn stored_images(captured: &Captured) -> Vec<String> {
        let row = captured.lock().unwrap().clone().unwrap();
        ImageUrls::parse(row["image_url"].as_str().unwrap())
            .as_slice()
            .to_vec()
    }

    #[tokio::test]
    async fn test_missing_fields_are_reported_per_field() {
        let client = unreachable_client().await;
        let mut submission = submission();
        submission.values.name = "  ".to_string();
        submission.values.price = String::new();
        submission.values.category_id = "fruit".to_string();

        let result = ProductService::new(&client, BUCKET)
            .add_product(&submission)
            .await;

        assert!(!result.success);
        assert_eq!(result.message, "Please correct the errors below.");
        assert_eq!(result.errors.get("name"), ["Name is required"]);
        assert_eq!(result.errors.first("price"), Some("Price is required"));
        assert_eq!(result.errors.first("category_id"), Some("Invalid category"));
        assert!(!result.errors.has("description"));
    }

    #[tokio::test]
    async fn test_rejects_unsupported_and_oversized_images() {
        let client = unreachable_client().await;
        let mut submission = submission();
        submission.files = vec![
            ImageFile {
                file_name: "notes.gif".to_string(),
                content_type: Some("image/gif".to_string()),
                bytes: vec![1],
            },
            ImageFile {
                bytes: vec![0; MAX_IMAGE_BYTES + 1],
                ..webp("huge.webp")
            },
        ];

        let result = ProductService::new(&client, BUCKET)
            .add_product(&submission)
            .await;

        assert!(!result.success);
        assert_eq!(result.errors.get("image_file").len(), 2);
    }

    #[tokio::test]
    async fn test_add_uploads_images_and_stores_their_urls() {
        let captured = Captured::default();
        let client = stub_client(recording_backend(&captured)).await;
        let mut submission = submission();
        submission.files = vec![webp("Pears on Table.webp"), ImageFile::default()];

        let result = ProductService::new(&client, BUCKET)
            .add_product(&submission)
            .await;

        assert!(result.success, "{}", result.message);
        assert_eq!(result.message, "Product added successfully.");
        let images = stored_images(&captured);
        assert_eq!(images.len(), 1);
        assert!(images[0].contains("/storage/v1/object/public/product-images/products/"));
        assert!(images[0].ends_with("-pears-on-table.webp"));
    }

    #[tokio::test]
    async fn test_update_without_files_keeps_existing_images() {
        let captured = Captured::default();
        let client = stub_client(recording_backend(&captured)).await;
        let mut submission = submission();
        submission.values.image_url =
            Some(r#"["https://cdn.test/a.webp","https://cdn.test/b.webp"]"#.to_string());

        let result = ProductService::new(&client, BUCKET)
            .update_product(PEAR_ID.parse().unwrap(), &submission)
            .await;

        assert!(result.success, "{}", result.message);
        assert_eq!(result.message, "Product updated successfully.");
        assert_eq!(
            stored_images(&captured),
            ["https://cdn.test/a.webp", "https://cdn.test/b.webp"]
        );
    }

    #[tokio::test]
    async fn test_update_with_files_replaces_existing_images() {
        let captured = Captured::default();
        let client = stub_client(recording_backend(&captured)).await;
        let mut submission = submission();
        submission.values.image_url = Some(r#"["https://cdn.test/a.webp"]"#.to_string());
        submission.files = vec![webp("new.webp")];

        ProductService::new(&client, BUCKET)
            .update_product(PEAR_ID.parse().unwrap(), &submission)
            .await;

        let images = stored_images(&captured);
        assert_eq!(images.len(), 1);
        assert!(images[0].ends_with("-new.webp"));
    }

    #[tokio::test]
    async fn test_upload_failure_is_reported() {
        let client = stub_client(Router::new().route(
            "/storage/v1/object/{*path}",
            post(|| async {
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    Json(json!({ "statusCode": "413", "error": "Payload too large", "message": "The object exceeded the maximum allowed size" })),
                )
            }),
        ))
        .await;
        let mut submission = submission();
        submission.files = vec![webp("pears.webp")];

        let result = ProductService::new(&client, BUCKET)
            .add_product(&submission)
            .await;

        assert!(!result.success);
        assert!(result.message.starts_with("Failed to upload image: "));
    }

    #[tokio::test]
    async fn test_backend_rejection_is_reported() {
        let client = stub_client(Router::new().route(
            "/rest/v1/products",
            patch(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({ "code": "23505", "message": "duplicate key value" })),
                )
            }),
        ))
        .await;

        let result = ProductService::new(&client, BUCKET)
            .update_product(PEAR_ID.parse().unwrap(), &submission())
            .await;

        assert!(!result.success);
        assert_eq!(result.message, "Failed to update product: duplicate key value");
    }

    #[tokio::test]
    async fn test_delete_product() {
        let client = stub_client(
            Router::new().route("/rest/v1/products", delete(|| async { StatusCode::NO_CONTENT })),
        )
        .await;
        let result = ProductService::new(&client, BUCKET)
            .delete_product(PEAR_ID.parse().unwrap())
            .await;
        assert!(result.success);
        assert_eq!(result.message, "Product deleted successfully.");

        let client = unreachable_client().await;
        let result = ProductService::new(&client, BUCKET)
            .delete_product(PEAR_ID.parse().unwrap())
            .await;
        assert!(!result.success);
        assert!(result.message.starts_with("Failed to delete product: "));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Pears (1).WEBP"), "pears--1-.webp");
        assert_eq!(sanitize_file_name(r"C:\Users\me\apple.png"), "apple.png");
        assert_eq!(sanitize_file_name("..."), "image");
    }

    #[test]
    fn test_content_type_follows_extension() {
        let jpeg = ImageFile {
            file_name: "a.JPG".to_string(),
            content_type: None,
            bytes: vec![1],
        };
        assert_eq!(jpeg.image_content_type(), Some("image/jpeg"));

        let mislabelled = ImageFile {
            content_type: Some("text/html".to_string()),
            ..jpeg
        };
        assert_eq!(mislabelled.image_content_type(), None);
    }
}
