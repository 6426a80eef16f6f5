//! Product management route handlers.
//!
//! The form posts multipart data to the add/edit actions; the handler runs the
//! action, settles the [`ProductForm`] with its result, then either redirects
//! (flashing the toast) or re-renders the form with the toast and field
//! errors.

use askama::Template;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;
use verdant_market_core::{Category, ProductId, ProductListRow};

use super::{render, see_other};
use crate::components::{
    DataTableConfig, FormMode, ProductForm, ProductFormValues, Toast, products_table_config,
};
use crate::db::{CategoryRepository, ProductRepository, products::list_products};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::CurrentAdmin;
use crate::services::{ImageFile, ProductService, ProductSubmission};
use crate::state::AppState;

/// The product table.
pub const LIST_PATH: &str = "/admin/products";

/// Request body ceiling for the product form (several images per post).
const MAX_FORM_BYTES: usize = 32 * 1024 * 1024;

/// Product table row for templates.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&ProductListRow> for ProductRowView {
    fn from(row: &ProductListRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name.clone(),
            category: row.category_name().unwrap_or("Uncategorized").to_string(),
            price: row.price.to_string(),
            image_url: row.images().first().map(ToString::to_string),
        }
    }
}

/// Products list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin: CurrentAdmin,
    pub current_path: &'static str,
    pub table: DataTableConfig,
    pub products: Vec<ProductRowView>,
    pub toast: Option<Toast>,
}

/// Add/edit product page template.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin: CurrentAdmin,
    pub current_path: &'static str,
    pub form: ProductForm,
    pub toast: Option<Toast>,
}

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_PATH, get(index))
        .route("/admin/products/add", get(add_page).post(add))
        .route("/admin/products/{id}/edit", get(edit_page).post(edit))
        .route("/admin/products/{id}/delete", post(delete))
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES))
}

/// Product table.
///
/// GET /admin/products
#[instrument(skip_all)]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> impl IntoResponse {
    let products = list_products(state.backend()).await;
    let toast = take_flash(&session).await;

    render(&ProductsIndexTemplate {
        admin,
        current_path: LIST_PATH,
        table: products_table_config(),
        products: products.iter().map(ProductRowView::from).collect(),
        toast,
    })
}

/// New product form.
///
/// GET /admin/products/add
#[instrument(skip_all)]
async fn add_page(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let categories = load_categories(&state).await;
    render(&ProductFormTemplate {
        admin,
        current_path: LIST_PATH,
        form: ProductForm::create(categories),
        toast: None,
    })
}

/// Create a product.
///
/// POST /admin/products/add
#[instrument(skip_all)]
async fn add(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response> {
    let submission = read_submission(multipart).await?;
    let mut form = ProductForm::with_values(
        FormMode::Create,
        submission.values.clone(),
        load_categories(&state).await,
    );

    let result = product_service(&state).add_product(&submission).await;
    let outcome = form.settle(result);

    if let Some(to) = outcome.navigate_to {
        if let Some(toast) = &outcome.toast {
            set_flash(&session, toast).await?;
        }
        return Ok(see_other(&headers, to));
    }

    Ok(render(&ProductFormTemplate {
        admin,
        current_path: LIST_PATH,
        form,
        toast: outcome.toast,
    })
    .into_response())
}

/// Edit product form.
///
/// GET /admin/products/{id}/edit
#[instrument(skip(admin, state))]
async fn edit_page(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_product_id(&id)?;
    let products = ProductRepository::new(state.backend());
    let (product, categories) = tokio::join!(products.get(id), load_categories(&state));
    let product = product?.ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(render(&ProductFormTemplate {
        admin,
        current_path: LIST_PATH,
        form: ProductForm::edit(&product, categories),
        toast: None,
    })
    .into_response())
}

/// Update a product.
///
/// The admin stays on the form either way; after a successful update the
/// form is reloaded from the stored row so new images show.
///
/// POST /admin/products/{id}/edit
#[instrument(skip(admin, state, multipart))]
async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let id = parse_product_id(&id)?;
    let submission = read_submission(multipart).await?;
    let mut form = ProductForm::with_values(
        FormMode::Edit(id),
        submission.values.clone(),
        load_categories(&state).await,
    );

    let result = product_service(&state).update_product(id, &submission).await;
    if result.success {
        match ProductRepository::new(state.backend()).get(id).await {
            Ok(Some(product)) => form.values = ProductFormValues::from_product(&product),
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to reload product after update: {e}"),
        }
    }
    let outcome = form.settle(result);

    Ok(render(&ProductFormTemplate {
        admin,
        current_path: LIST_PATH,
        form,
        toast: outcome.toast,
    })
    .into_response())
}

/// Delete a product and return to the table.
///
/// POST /admin/products/{id}/delete
#[instrument(skip_all, fields(id = %id))]
async fn delete(
    _admin: RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_product_id(&id)?;
    let result = product_service(&state).delete_product(id).await;

    if let Some(toast) = Toast::for_result(&result) {
        set_flash(&session, &toast).await?;
    }
    Ok(see_other(&headers, LIST_PATH))
}

fn product_service(state: &AppState) -> ProductService<'_> {
    ProductService::new(state.backend(), &state.config().product_images_bucket)
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}

/// Category options for the form. A failed query leaves the select empty.
async fn load_categories(state: &AppState) -> Vec<Category> {
    CategoryRepository::new(state.backend())
        .list_all()
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Error fetching categories: {e}");
            Vec::new()
        })
}

/// Collect the multipart form into a submission.
///
/// Unknown fields are ignored. Checkboxes are on when present.
async fn read_submission(mut multipart: Multipart) -> Result<ProductSubmission> {
    let mut submission = ProductSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if name == "image_file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(ToString::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            submission.files.push(ImageFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let values = &mut submission.values;
        match name.as_str() {
            "name" => values.name = value,
            "price" => values.price = value,
            "description" => values.description = value,
            "long_description" => values.long_description = value,
            "category_id" => values.category_id = value,
            "data_ai_hint" => values.data_ai_hint = value,
            "image_url" => values.image_url = Some(value),
            "is_featured" => values.is_featured = true,
            "is_best_seller" => values.is_best_seller = true,
            _ => {}
        }
    }

    Ok(submission)
}
