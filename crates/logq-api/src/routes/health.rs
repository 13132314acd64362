//! Health and service-info endpoints.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::AppState;

/// GET /health: liveness check.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "corpus_size": state.corpus_size,
    }))
}

/// GET /: service description.
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": "logq",
        "description": "natural-language log requests to SPL queries",
        "version": env!("CARGO_PKG_VERSION"),
        "confidence_threshold": state.parser.threshold(),
        "endpoints": ["GET /health", "POST /parse"],
    }))
}
