//! Query translation endpoint.

use axum::Json;
use axum::extract::State;

use logq_protocol::{ParseRequest, ParseResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Longest accepted query text, in characters.
pub const MAX_QUERY_CHARS: usize = 2048;

/// POST /parse: translate one request in forced mode.
///
/// Unresolved slots stay wildcard; this endpoint never asks back.
pub async fn parse_query(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> ApiResult<Json<ParseResponse>> {
    if req.query.chars().count() > MAX_QUERY_CHARS {
        return Err(ApiError::BadRequest(format!(
            "query exceeds {MAX_QUERY_CHARS} characters"
        )));
    }

    let parser = state.parser.clone();
    let text = req.query.clone();
    // Drift appends are blocking file I/O.
    let parsed = tokio::task::spawn_blocking(move || parser.parse_forced(&text))
        .await
        .map_err(|e| ApiError::Internal(format!("parse task failed: {e}")))?;

    tracing::info!(
        spl = %parsed.query,
        drift = parsed.drift.is_some(),
        drift_written = parsed.drift_written,
        "query parsed"
    );

    Ok(Json(ParseResponse {
        query: req.query,
        slots: parsed.slots,
        authority: parsed.authority,
        spl: parsed.query,
        drift_logged: parsed.drift_written,
    }))
}
