// src/handlers/health.rs

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;

use crate::config::Config;

/// Liveness probe. Does not touch the document store.
pub async fn health_check(State(config): State<Config>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "version": config.version,
    }))
}
