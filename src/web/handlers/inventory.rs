//! Inventory handlers - list, view, save and delete products.

use crate::{
    core::product::{self, NewProduct},
    entities::product::Model as ProductModel,
    errors::{Error, Result},
    web::{AppState, ApiJson, CurrentUser},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

/// Body of `POST /inventory`
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    /// Existing product to update; absent or unknown inserts a new one
    #[serde(default)]
    pub id: Option<i64>,
    /// Product fields
    #[serde(flatten)]
    pub product: NewProduct,
}

/// Lists active products.
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<ProductModel>>> {
    Ok(Json(product::get_all_active_products(&state.database).await?))
}

/// Fetches one active product.
pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ProductModel>> {
    product::get_active_product(state.database.as_ref(), id)
        .await?
        .map(Json)
        .ok_or(Error::ProductNotFound { id })
}

/// Inserts or updates a product.
pub async fn save(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(form): ApiJson<ProductForm>,
) -> Result<Json<ProductModel>> {
    let saved = product::save_product(&state.database, form.id, form.product).await?;
    tracing::debug!(product_id = saved.id, by = %user.username, "Product saved");
    Ok(Json(saved))
}

/// Removes a product from the catalog.
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    product::delete_product(&state.database, id).await?;
    tracing::debug!(product_id = id, by = %user.username, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
