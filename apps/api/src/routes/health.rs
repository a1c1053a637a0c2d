use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness check. Does not touch the enrichment service.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-analyzer"
    }))
}
