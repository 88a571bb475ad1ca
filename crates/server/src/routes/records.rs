use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tokio::task::spawn_blocking;

use namefind_common::api::{
    AddRecordRequest, AddRecordResponse, RecordView, ReloadResponse, StatsResponse,
};

use crate::{db, AppState};

use super::{error_response, internal_error, NAME_TOO_LONG};

// ── POST /api/v1/records ──────────────────────────────────────────────────────

pub async fn add_record(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddRecordRequest>,
) -> impl IntoResponse {
    let Some(mut record) = req.into_record() else {
        return error_response(StatusCode::BAD_REQUEST, "Name is required");
    };
    if state.config.search.query_too_long(&record.name) {
        return error_response(StatusCode::BAD_REQUEST, NAME_TOO_LONG);
    }
    record.ensure_case_fir(chrono::Local::now().date_naive());

    let _writing = state.writes.lock().await;
    let db_path = state.db_path.clone();
    let to_store = record.clone();
    let inserted = spawn_blocking(move || {
        let conn = db::open(&db_path)?;
        db::insert_record(&conn, &to_store)
    })
    .await
    .unwrap_or_else(|e| Err(anyhow::anyhow!(e)));

    match inserted {
        Ok(id) => {
            tracing::info!(id, name = %record.name, case_fir = ?record.case_fir, "record added");
            let view = RecordView::from(&record);
            state.store.push(record);
            (StatusCode::CREATED, Json(AddRecordResponse { record: view })).into_response()
        }
        Err(e) => internal_error("add_record", e),
    }
}

// ── POST /api/v1/reload ───────────────────────────────────────────────────────

pub async fn reload(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let _writing = state.writes.lock().await;
    let db_path = state.db_path.clone();
    let loaded = spawn_blocking(move || {
        let conn = db::open(&db_path)?;
        db::load_records(&conn)
    })
    .await
    .unwrap_or_else(|e| Err(anyhow::anyhow!(e)));

    match loaded {
        Ok(records) => {
            let count = records.len();
            state.store.replace(records);
            tracing::info!("reloaded {count} records");
            Json(ReloadResponse { records: count }).into_response()
        }
        Err(e) => internal_error("reload", e),
    }
}

// ── GET /api/v1/stats ─────────────────────────────────────────────────────────

pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatsResponse {
        records: state.store.len(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
