pub mod db;
pub mod import;
pub mod routes;
pub mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use namefind_common::{
    config::ServerAppConfig,
    matcher::Matcher,
    normalize::Normalizer,
    translate,
};

use crate::store::RecordStore;

pub const DB_FILE: &str = "records.db";

pub struct AppState {
    pub config: ServerAppConfig,
    pub db_path: PathBuf,
    pub matcher: Matcher,
    pub store: RecordStore,
    /// Held across a database write and the matching snapshot update, so
    /// adds and reloads publish in commit order.
    pub writes: tokio::sync::Mutex<()>,
}

impl AppState {
    /// Open (or create) the database under `data_dir`, seed it from the
    /// configured CSV when empty, and load the record snapshot.
    pub fn open(config: ServerAppConfig) -> Result<Self> {
        let data_dir = PathBuf::from(&config.server.data_dir);
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;
        let db_path = data_dir.join(DB_FILE);

        let conn = db::open(&db_path)?;
        if let Some(csv_path) = &config.data.csv_path {
            if db::count_records(&conn)? == 0 {
                let imported = import_csv(&conn, Path::new(csv_path))?;
                tracing::info!("seeded database with {imported} records from {csv_path}");
            }
        }
        let records = db::load_records(&conn)?;
        tracing::info!("loaded {} records from {}", records.len(), db_path.display());

        let translator = translate::from_settings(&config.translation)?;
        let normalizer = Normalizer::new(
            translator,
            config.translation.source_lang.clone(),
            config.translation.target_lang.clone(),
        );
        let matcher = Matcher::new(normalizer, config.search.similarity_threshold);

        Ok(Self {
            config,
            db_path,
            matcher,
            store: RecordStore::new(records),
            writes: tokio::sync::Mutex::new(()),
        })
    }
}

/// Read a CSV file and insert its records. Returns the number inserted.
pub fn import_csv(conn: &rusqlite::Connection, csv_path: &Path) -> Result<usize> {
    let today = chrono::Local::now().date_naive();
    let import = import::read_csv_file(csv_path, today)?;
    if import.skipped > 0 {
        tracing::warn!("{}: skipped {} rows without a name", csv_path.display(), import.skipped);
    }
    db::insert_records(conn, &import.records)
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/api/v1/search",  post(routes::search))
        .route("/api/v1/suggest", get(routes::suggest))
        .route("/api/v1/records", post(routes::add_record))
        .route("/api/v1/process", get(routes::process_name))
        .route("/api/v1/stats",   get(routes::get_stats))
        .route("/api/v1/reload",  post(routes::reload))
        // Older dashboard clients post here.
        .route("/search",         post(routes::search))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(64 * 1024)),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {o:?}");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}
