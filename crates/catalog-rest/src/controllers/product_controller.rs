//! Product controller.

use crate::{
    extractors::{AuthenticatedUser, ListQueryParams, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use catalog_core::{PagedResult, ProductId};
use catalog_service::{CreateProductRequest, ProductListItem, ProductResponse, UpdateProductRequest};
use tracing::debug;

/// Creates the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
}

/// List products.
///
/// Served from the list cache when a page for the same normalized query is
/// present.
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ListQueryParams),
    responses(
        (status = 200, description = "One page of products", body = PagedResult<ProductListItem>)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListQueryParams>,
) -> ApiResult<PagedResult<ProductListItem>> {
    let page = state.product_service.list(params.into()).await?;
    ok(page)
}

/// Get a product by ID.
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found", body = catalog_core::ErrorResponse)
    )
)]
pub async fn get_product(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<ProductResponse> {
    let product = state.product_service.get(ProductId(id)).await?;
    ok(product)
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = CreateProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid request", body = catalog_core::ErrorResponse),
        (status = 401, description = "Not authenticated", body = catalog_core::ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponse>>), AppError> {
    debug!("Create product request from user {}", user.user_id()?);

    let product = state.product_service.create(request).await?;
    Ok(created(product))
}

/// Update a product.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid request", body = catalog_core::ErrorResponse),
        (status = 401, description = "Not authenticated", body = catalog_core::ErrorResponse),
        (status = 404, description = "Product not found", body = catalog_core::ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> ApiResult<ProductResponse> {
    debug!("Update product {} request from user {}", id, user.user_id()?);

    let product = state.product_service.update(ProductId(id), request).await?;
    ok(product)
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Not authenticated", body = catalog_core::ErrorResponse),
        (status = 404, description = "Product not found", body = catalog_core::ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    debug!("Delete product {} request from user {}", id, user.user_id()?);

    state.product_service.delete(ProductId(id)).await?;
    Ok(no_content())
}
