use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tokio::task::spawn_blocking;

use namefind_common::api::{SearchHit, SearchRequest, SearchResponse, SuggestResponse, Suggestion};

use crate::AppState;

use super::{error_response, internal_error, NAME_TOO_LONG};

// ── POST /api/v1/search ───────────────────────────────────────────────────────

pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> impl IntoResponse {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Name is required");
    }
    if state.config.search.query_too_long(&name) {
        return error_response(StatusCode::BAD_REQUEST, NAME_TOO_LONG);
    }

    let records = state.store.snapshot();
    let started = std::time::Instant::now();
    let hits = match spawn_blocking({
        let state = state.clone();
        let name = name.clone();
        move || {
            state
                .matcher
                .search(&name, &records)
                .iter()
                .map(SearchHit::from)
                .collect::<Vec<_>>()
        }
    })
    .await
    {
        Ok(hits) => hits,
        Err(e) => return internal_error("search", e.into()),
    };

    tracing::debug!(
        query = %name,
        hits = hits.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "search"
    );

    if hits.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(SearchResponse { results: vec![], message: Some("No matches found".into()) }),
        )
            .into_response();
    }
    Json(SearchResponse { results: hits, message: None }).into_response()
}

// ── GET /api/v1/suggest?name=X[&limit=N] ──────────────────────────────────────

#[derive(Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub name: String,
    pub limit: Option<usize>,
}

pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestParams>,
) -> impl IntoResponse {
    let name = params.name.trim().to_string();
    if name.is_empty() {
        return Json(SuggestResponse { suggestions: vec![] }).into_response();
    }

    let settings = &state.config.search;
    if settings.query_too_long(&name) {
        return error_response(StatusCode::BAD_REQUEST, NAME_TOO_LONG);
    }
    let limit = params
        .limit
        .unwrap_or(settings.suggest_limit)
        .min(settings.max_suggest_limit);

    let records = state.store.snapshot();
    match spawn_blocking({
        let state = state.clone();
        move || {
            state
                .matcher
                .suggest(&name, &records, limit)
                .iter()
                .map(Suggestion::from)
                .collect::<Vec<_>>()
        }
    })
    .await
    {
        Ok(suggestions) => Json(SuggestResponse { suggestions }).into_response(),
        Err(e) => internal_error("suggest", e.into()),
    }
}
