//! API route handlers
//!
//! - `health`: Health checks, readiness, and metrics
//! - `webhook`: Telegram update intake

pub mod health;
pub mod webhook;

use crate::error::ServerError;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// API version and base info
///
/// # Response
///
/// ```json
/// {
///   "name": "qrbot",
///   "version": "0.1.0",
///   "uptime_seconds": 12,
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let metadata = health::metadata();
    Json(json!({
        "name": "qrbot",
        "version": metadata.version,
        "uptime_seconds": metadata.uptime_seconds,
        "endpoints": [
            format!("POST {}", state.config.webhook_path),
            "GET /health".to_string(),
            "GET /ready".to_string(),
            "GET /metrics".to_string(),
        ]
    }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
