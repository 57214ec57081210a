//! Product CRUD handlers.
//!
//! Reads go through the tenant-scoped repository, so a cross-tenant id is
//! indistinguishable from a missing one (404). Writes load the row unscoped
//! and let the repository's boundary check reject cross-tenant mutations
//! explicitly (403) - the policy split the error taxonomy calls for.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use tenancy_core::{context::TenantContext, error::AppError, store::EntityStore};

use crate::AppState;
use crate::dtos::{
    CreateProductRequest, ListProductsQuery, ProductListResponse, ProductResponse,
    UpdateProductRequest,
};
use crate::models::Product;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

pub async fn create_product(
    State(state): State<AppState>,
    ctx: TenantContext,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let product = state
        .products
        .add(&ctx, Product::new(req.name, req.code, req.price))
        .await?;

    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

pub async fn get_product(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state
        .products
        .get_by_id(&ctx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("product {} not found", id)))?;

    Ok(Json(ProductResponse::from(product)))
}

pub async fn list_products(
    State(state): State<AppState>,
    ctx: TenantContext,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ProductListResponse>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let items = state.products.list_paged(&ctx, page, page_size).await?;
    let total = state.products.count(&ctx).await?;

    Ok(Json(ProductListResponse {
        items: items.into_iter().map(ProductResponse::from).collect(),
        total,
        page,
        page_size,
    }))
}

pub async fn update_product(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    req.validate()?;

    // Unscoped load: the repository decides between 403 and 404 semantics.
    let mut product = state
        .store
        .fetch(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("product {} not found", id)))?;

    product.apply_update(req.name, req.code, req.price);
    let product = state.products.update(&ctx, product).await?;

    tracing::info!(product_id = %product.id, "product updated");
    Ok(Json(ProductResponse::from(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let product = state
        .store
        .fetch(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("product {} not found", id)))?;

    state.products.delete(&ctx, product).await?;

    tracing::info!(product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
