// handlers/items.rs - CRUD on one category's items, scoped to the caller
//
// Every route here runs behind `validate_category` and then `require_identity`,
// so a handler always sees a parsed `Category` and an `AuthUser`.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::{Item, ItemPatch, NewItem};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::types::Category;

/// Ownership failures and missing records share this message on purpose
const NOT_FOUND_MESSAGE: &str = "Item not found or unauthorized";

/// GET /:category - List the caller's items
pub async fn list(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Item>> {
    let items = state.registry.handle(category).list(&user.uid).await?;
    Ok(ApiResponse::success(items))
}

/// POST /:category - Create an item owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> ApiResult<Item> {
    let Json(fields) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    fields
        .validate()
        .map_err(|errors| ApiError::validation_error("Invalid item", Some(errors)))?;

    let item = state.registry.handle(category).create(&user.uid, fields).await?;
    tracing::info!("Created {} item {} for {}", category, item.id, user.uid);
    Ok(ApiResponse::created(item))
}

/// PUT /:category/:id - Partially update one of the caller's items
pub async fn update(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(user): Extension<AuthUser>,
    Path((_, id)): Path<(String, String)>,
    payload: Result<Json<ItemPatch>, JsonRejection>,
) -> ApiResult<Item> {
    let Json(patch) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    patch
        .validate()
        .map_err(|errors| ApiError::validation_error("Invalid item", Some(errors)))?;
    let id = parse_item_id(&id)?;

    state
        .registry
        .handle(category)
        .update(&user.uid, id, patch)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))
}

/// DELETE /:category/:id - Permanently remove one of the caller's items
pub async fn delete(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(user): Extension<AuthUser>,
    Path((_, id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let id = parse_item_id(&id)?;

    if !state.registry.handle(category).delete(&user.uid, id).await? {
        return Err(ApiError::not_found(NOT_FOUND_MESSAGE));
    }

    tracing::info!("Deleted {} item {} for {}", category, id, user.uid);
    Ok(ApiResponse::success(json!({ "message": "Item deleted successfully" })))
}

/// An id that cannot name any item is reported like any other missing item
fn parse_item_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(NOT_FOUND_MESSAGE))
}
