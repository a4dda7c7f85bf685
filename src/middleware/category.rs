use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;

use crate::error::ApiError;
use crate::types::Category;

/// Reject any `:category` outside the allow-list before authentication runs,
/// and hand the parsed category to the handler through request extensions.
pub async fn validate_category(
    Path(params): Path<HashMap<String, String>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let raw = params.get("category").map(String::as_str).unwrap_or_default();

    let category: Category = raw.parse().map_err(|e| {
        tracing::debug!("{}", e);
        ApiError::bad_request("Invalid category")
    })?;

    request.extensions_mut().insert(category);
    Ok(next.run(request).await)
}
