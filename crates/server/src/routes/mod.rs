mod process;
mod records;
mod search;

pub use process::process_name;
pub use records::{add_record, get_stats, reload};
pub use search::{search, suggest};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use namefind_common::api::ErrorResponse;

pub(super) const NAME_TOO_LONG: &str = "Name is too long";

// ── Shared helpers ─────────────────────────────────────────────────────────────

pub(super) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

/// Log an internal failure and answer 500.
pub(super) fn internal_error(route: &str, e: anyhow::Error) -> Response {
    tracing::error!("{route}: {e:#}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}
