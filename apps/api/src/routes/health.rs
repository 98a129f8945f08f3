use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
    }))
}

/// GET /api/test
/// Liveness check kept for existing clients.
pub async fn api_test_handler() -> Json<Value> {
    Json(json!({ "status": "API is working" }))
}
