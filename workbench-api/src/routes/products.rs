//! Product endpoints
//!
//! # Endpoints
//!
//! - `POST   /v1/products` - Create a product (201)
//! - `GET    /v1/products` - List products (`name`, `category`, `sku`,
//!   `price_from`, `price_to`, `stock_from`, `stock_to`, `created_at_from`,
//!   `created_at_to`, `limit`, `offset`, `sort`)
//! - `GET    /v1/products/:id` - Get a product
//! - `PUT    /v1/products/:id` - Update everything except stock
//! - `DELETE /v1/products/:id` - Soft-delete a product (204)
//! - `PATCH  /v1/products/:id/stock` - Add a signed, non-zero quantity to stock
//! - `GET    /v1/products/sku/:sku` - Get a product by SKU

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ListQuery},
    middleware::auth::AuthContext,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};
use workbench_shared::models::{CreateProduct, Product, ProductFilter, UpdateProduct};

/// Stock adjustment request
///
/// `quantity` is a delta: positive restocks, negative consumes.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct StockAdjustment {
    #[validate(custom(function = "non_zero"))]
    pub quantity: i32,
}

fn non_zero(quantity: i32) -> Result<(), ValidationError> {
    if quantity == 0 {
        return Err(
            ValidationError::new("non_zero").with_message("Quantity must not be zero".into()),
        );
    }
    Ok(())
}

pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.products.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(
    State(state): State<AppState>,
    query: ListQuery<ProductFilter>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .products
        .list_products(&query.filter, &query.page)
        .await?;
    tracing::debug!(count = products.len(), "Listed products");
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.products.get_product_by_id(id).await?))
}

pub async fn get_product_by_sku(
    State(state): State<AppState>,
    ApiPath(sku): ApiPath<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.products.get_product_by_sku(&sku).await?))
}

pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdateProduct>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.products.update_product(id, input).await?))
}

/// Applies a stock delta
///
/// # Errors
///
/// - `400 Bad Request`: The delta would take stock below zero
/// - `404 Not Found`: Unknown or deleted product
pub async fn update_product_stock(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<StockAdjustment>,
) -> ApiResult<Json<Product>> {
    req.validate()?;
    let product = state.products.update_product_stock(id, req.quantity).await?;
    tracing::info!(
        actor = %auth.user_id,
        product_id = %id,
        quantity = req.quantity,
        stock = product.stock,
        "Adjusted stock"
    );
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.products.delete_product(id).await?;
    tracing::info!(actor = %auth.user_id, id = %id, "Deleted product");
    Ok(StatusCode::NO_CONTENT)
}
