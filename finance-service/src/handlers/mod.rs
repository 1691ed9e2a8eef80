//! HTTP handlers for finance-service.

pub mod finance;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::services::metrics::get_metrics;
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(db) = &state.db {
        if let Err(err) = db.health_check().await {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "details": err.to_string() })),
            );
        }
    }
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "finance-service" })),
    )
}

pub async fn metrics() -> impl IntoResponse {
    (StatusCode::OK, get_metrics())
}
