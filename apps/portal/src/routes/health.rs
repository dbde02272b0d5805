use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Reports liveness only; the backend is not probed.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "talentbridge-portal"
    }))
}
