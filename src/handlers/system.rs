use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::types::Category;

/// GET / - Service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "list-tracker",
        "version": env!("CARGO_PKG_VERSION"),
        "categories": Category::ALL,
        "endpoints": {
            "list": "GET /:category",
            "create": "POST /:category",
            "update": "PUT /:category/:id",
            "delete": "DELETE /:category/:id",
        }
    }))
}

/// GET /health - Liveness plus a store round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.registry.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "error": e.to_string()
                })),
            )
        }
    }
}
