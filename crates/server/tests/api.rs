use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use namefind_common::config::parse_server_config;
use namefind_common::record::{Gender, NameRecord};
use namefind_server::{db, router, AppState, DB_FILE};

// ── helpers ──────────────────────────────────────────────────────────────────

struct TestServer {
    _dir: TempDir,
    state: Arc<AppState>,
}

impl TestServer {
    fn new(records: &[NameRecord]) -> Self {
        Self::with_config(records, "")
    }

    fn with_config(records: &[NameRecord], extra: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let conn = db::open(&dir.path().join(DB_FILE)).unwrap();
        db::insert_records(&conn, records).unwrap();
        drop(conn);

        let toml = format!(
            "[server]\ndata_dir = {:?}\n{extra}",
            dir.path().to_str().unwrap()
        );
        let config = parse_server_config(&toml).unwrap();
        let state = Arc::new(AppState::open(config).unwrap());
        Self { _dir: dir, state }
    }

    fn app(&self) -> Router {
        router(self.state.clone())
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(self.app(), req).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(self.app(), req).await
    }
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

fn record(name: &str, age: &str, location: &str) -> NameRecord {
    let mut r = NameRecord::new(name);
    r.age = Some(age.into());
    r.location = Some(location.into());
    r.case_type = Some("Theft".into());
    r.case_fir = Some(format!("FIR-{name}"));
    r.gender = Gender::Male;
    r
}

fn sample() -> Vec<NameRecord> {
    vec![
        record("Raviraj", "29", "Nashik"),
        record("Ravikumar", "41", "Nagpur"),
        record("Ravi Kumar", "34", "Pune"),
        record("Sita Devi", "52", "Thane"),
    ]
}

fn result_names(body: &Value, key: &str) -> Vec<String> {
    body[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

// ── search ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_ranks_near_exact_first() {
    let server = TestServer::new(&sample());
    let (status, body) = server.post("/api/v1/search", json!({"name": "ravi kumar"})).await;
    assert_eq!(status, StatusCode::OK);

    let names = result_names(&body, "results");
    assert_eq!(&names[..2], &["Ravi Kumar", "Ravikumar"]);
    assert!(!names.contains(&"Sita Devi".to_string()));

    let top = &body["results"][0];
    assert_eq!(top["nameDevanagari"], "रवि कुमर");
    assert_eq!(top["confidence"], 100);
    assert_eq!(top["score"], 200);
    assert_eq!(top["age"], "34");
    assert_eq!(top["caseType"], "Theft");
    assert_eq!(top["caseFIR"], "FIR-Ravi Kumar");
    assert_eq!(top["location"], "Pune");
    assert_eq!(top["gender"], "Male");
}

#[tokio::test]
async fn search_empty_name_is_bad_request() {
    let server = TestServer::new(&sample());
    let (status, body) = server.post("/api/v1/search", json!({"name": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");

    let (status, _) = server.post("/api/v1/search", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_no_match_is_not_found() {
    let server = TestServer::new(&sample());
    let (status, body) = server.post("/api/v1/search", json!({"name": "Zebediah"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["message"], "No matches found");
}

#[tokio::test]
async fn overlong_name_is_bad_request() {
    let server = TestServer::new(&sample());
    let long = "ravindra kumar sharma ".repeat(20);

    let (status, body) = server.post("/api/v1/search", json!({"name": long})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is too long");

    let uri = format!("/api/v1/suggest?name={}", long.trim().replace(' ', "%20"));
    let (status, _) = server.get(&uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.post("/api/v1/records", json!({"name": long})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(server.state.store.len(), 4);
}

#[tokio::test]
async fn max_query_chars_is_configurable() {
    let server = TestServer::with_config(&sample(), "[search]\nmax_query_chars = 4\n");
    let (status, _) = server.post("/api/v1/search", json!({"name": "sita"})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.post("/api/v1/search", json!({"name": "sita d"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_legacy_path() {
    let server = TestServer::new(&sample());
    let (status, body) = server.post("/search", json!({"name": "sita"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_names(&body, "results"), vec!["Sita Devi"]);
}

#[tokio::test]
async fn search_fills_unknown_sentinels() {
    let server = TestServer::new(&[NameRecord::new("Amit Sharma")]);
    let (_, body) = server.post("/api/v1/search", json!({"name": "amit"})).await;
    let hit = &body["results"][0];
    assert_eq!(hit["age"], "Unknown");
    assert_eq!(hit["location"], "Unknown");
    assert_eq!(hit["gender"], "Unknown");
}

#[tokio::test]
async fn search_devanagari_query() {
    let server = TestServer::new(&sample());
    let (status, body) = server.post("/api/v1/search", json!({"name": "रवि कुमार"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_names(&body, "results")[0], "Ravi Kumar");
}

#[tokio::test]
async fn search_without_translation_still_works() {
    let server = TestServer::with_config(&sample(), "[translation]\nbackend = \"none\"\n");
    let (status, body) = server.post("/api/v1/search", json!({"name": "ravi kumar"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_names(&body, "results")[0], "Ravi Kumar");
}

// ── suggest ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn suggest_is_limited_prefix_of_search() {
    let server = TestServer::new(&sample());
    let (_, full) = server.post("/api/v1/search", json!({"name": "ravi"})).await;
    let full = result_names(&full, "results");
    assert!(full.len() >= 2);

    let (status, body) = server.get("/api/v1/suggest?name=ravi&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let names = result_names(&body, "suggestions");
    assert_eq!(names, full[..2].to_vec());

    let first = body["suggestions"][0].as_object().unwrap();
    let mut keys: Vec<_> = first.keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["age", "location", "name", "score"]);
}

#[tokio::test]
async fn suggest_limit_capped_by_config() {
    let records: Vec<_> = (0..20).map(|i| record(&format!("Ravi {i}"), "30", "Pune")).collect();
    let server = TestServer::with_config(&records, "[search]\nmax_suggest_limit = 5\n");
    let (_, body) = server.get("/api/v1/suggest?name=ravi&limit=100").await;
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 5);

    let (_, body) = server.get("/api/v1/suggest?name=ravi").await;
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn suggest_empty_name_is_empty_list() {
    let server = TestServer::new(&sample());
    let (status, body) = server.get("/api/v1/suggest?name=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestions"], json!([]));
}

// ── records ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_record_generates_case_fir_and_is_searchable() {
    let server = TestServer::new(&sample());
    let (status, body) = server
        .post(
            "/api/v1/records",
            json!({"name": "Meena Patil", "age": 27, "gender": "female", "location": "Satara"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let fir = body["record"]["caseFIR"].as_str().unwrap();
    assert!(fir.starts_with("FIR"), "fir={fir}");
    assert_eq!(body["record"]["age"], "27");

    let (status, body) = server.post("/api/v1/search", json!({"name": "meena"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_names(&body, "results"), vec!["Meena Patil"]);

    // Persisted, not only in memory.
    let conn = db::open(&server.state.db_path).unwrap();
    assert_eq!(db::count_records(&conn).unwrap(), 5);
}

#[tokio::test]
async fn add_record_keeps_given_case_fir() {
    let server = TestServer::new(&[]);
    let (status, body) = server
        .post("/api/v1/records", json!({"name": "Meena", "caseFIR": "FIR-99"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let record = &body["record"];
    assert_eq!(record["caseFIR"], "FIR-99");
    for key in ["age", "gender", "caseType", "location"] {
        assert_eq!(record[key], "Unknown", "key={key}");
    }
    assert_eq!(record["nameDevanagari"], "मीन");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_and_reloads_keep_store_in_sync() {
    let server = TestServer::new(&sample());
    let app = server.app();

    let mut tasks = Vec::new();
    for i in 0..24 {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            let req = if i % 2 == 0 {
                let body = json!({"name": format!("Meena {i}")});
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/records")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap()
            } else {
                Request::builder().method("POST").uri("/api/v1/reload").body(Body::empty()).unwrap()
            };
            send(app, req).await.0
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().is_success());
    }

    let conn = db::open(&server.state.db_path).unwrap();
    assert_eq!(db::count_records(&conn).unwrap(), 16);
    assert_eq!(server.state.store.len(), 16);
    let snapshot = server.state.store.snapshot();
    let mut names: Vec<_> = snapshot.iter().map(|r| r.name.as_str()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 16);
}

#[tokio::test]
async fn add_record_requires_name() {
    let server = TestServer::new(&[]);
    let (status, _) = server.post("/api/v1/records", json!({"name": "", "age": 3})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(server.state.store.len(), 0);
}

#[tokio::test]
async fn reload_picks_up_external_inserts() {
    let server = TestServer::new(&sample());
    let conn = db::open(&server.state.db_path).unwrap();
    db::insert_record(&conn, &NameRecord::new("Farida Khan")).unwrap();

    let (_, before) = server.post("/api/v1/search", json!({"name": "farida khan"})).await;
    assert_eq!(before["results"], json!([]));

    let (status, body) = server.post("/api/v1/reload", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 5);

    let (_, after) = server.post("/api/v1/search", json!({"name": "farida khan"})).await;
    assert_eq!(result_names(&after, "results"), vec!["Farida Khan"]);
}

// ── misc ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn process_reports_both_scripts() {
    let server = TestServer::new(&[]);
    let (status, body) = server.get("/api/v1/process?name=Ravi%20Kumar").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["normalized"], "ravi kumar");
    assert_eq!(body["roman"], "ravi kumar");
    assert_eq!(body["devanagari"], "रवि कुमर");
    assert_eq!(body["phonetic"], "R125");
}

#[tokio::test]
async fn process_accented_latin_is_romanized() {
    let server = TestServer::new(&[]);
    let (status, body) = server.get("/api/v1/process?name=Jos%C3%A9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["normalized"], "josé");
    assert_eq!(body["roman"], "jose");
}

#[tokio::test]
async fn stats_counts_records() {
    let server = TestServer::new(&sample());
    let (status, body) = server.get("/api/v1/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 4);
}

#[tokio::test]
async fn csv_seeds_empty_database() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("records.csv");
    std::fs::write(&csv, "name,age,location\nRavi Kumar,34,Pune\n,1,x\n").unwrap();
    let toml = format!(
        "[server]\ndata_dir = {:?}\n[data]\ncsv_path = {:?}\n",
        dir.path().join("data").to_str().unwrap(),
        csv.to_str().unwrap(),
    );
    let config = parse_server_config(&toml).unwrap();
    let state = AppState::open(config.clone()).unwrap();
    assert_eq!(state.store.len(), 1);
    drop(state);

    // A second start does not import again.
    let state = AppState::open(config).unwrap();
    assert_eq!(state.store.len(), 1);
}
