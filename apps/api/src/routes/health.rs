use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports whether a model bundle is loaded and the advisor is configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let manifest = state.bundle.as_ref().map(|b| b.manifest());
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "skillence-api",
        "models_loaded": manifest.is_some(),
        "bundle_id": manifest.map(|m| m.bundle_id),
        "trained_at": manifest.map(|m| m.trained_at),
        "llm_configured": state.llm.is_some(),
    }))
}
