use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tokio::task::spawn_blocking;

use namefind_common::api::ProcessResponse;

use crate::AppState;

use super::{error_response, internal_error, NAME_TOO_LONG};

// ── GET /api/v1/process?name=X ────────────────────────────────────────────────
//
// Shows what the matcher compares for a name: the folded query, both script
// renderings, and the phonetic code.

#[derive(Deserialize)]
pub struct ProcessParams {
    #[serde(default)]
    pub name: String,
}

pub async fn process_name(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProcessParams>,
) -> impl IntoResponse {
    if params.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Name is required");
    }
    if state.config.search.query_too_long(params.name.trim()) {
        return error_response(StatusCode::BAD_REQUEST, NAME_TOO_LONG);
    }

    // Normalization may call the remote translator.
    match spawn_blocking(move || {
        let query = state.matcher.normalizer().normalize_query(&params.name);
        let (roman, devanagari) = if query.is_forward() {
            (query.raw.clone(), query.translated.clone())
        } else {
            (query.translated.clone(), query.raw.clone())
        };
        ProcessResponse { normalized: query.raw, roman, devanagari, phonetic: query.phonetic_code }
    })
    .await
    {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => internal_error("process_name", e.into()),
    }
}
