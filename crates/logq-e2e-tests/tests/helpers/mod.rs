//! Shared test harness for E2E integration tests.
//!
//! Fits the hybrid parser on the bundled corpus and wires it to an
//! in-memory drift log and the HTTP router.

#![allow(dead_code)]

use std::sync::{Arc, LazyLock};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use logq_api::drift::SerializedDriftLog;
use logq_api::routes::build_router;
use logq_api::state::AppState;
use logq_parser::corpus::load_corpus;
use logq_parser::{HybridParser, MockDriftLog, ParserConfig};
use logq_protocol::TrainingExample;

/// Bundled training corpus, relative to this crate.
pub const CORPUS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/train_queries.csv");

/// Example configuration file shipped with the workspace.
pub const CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/logq.toml");

/// The bundled corpus, loaded once per test binary.
pub static CORPUS: LazyLock<Vec<TrainingExample>> =
    LazyLock::new(|| load_corpus(CORPUS_PATH).expect("bundled corpus loads"));

/// Inputs covering empty, garbage, partial and complete requests.
pub const SAMPLE_TEXTS: &[&str] = &[
    "",
    "   ",
    "%%% ### ???",
    "qqq zzz xyzzy",
    "show failed logins from yesterday from auth by user alice",
    "show failed logins",
    "errors in the web server logs today",
    "who deleted records on disk this week by root",
    "list blocked traffic on the firewall in the last hour",
    "downloads by user carol",
    "ssh",
    "yesterday",
    "new accounts created in windows event logs",
    "show logins \"quoted\" \\ backslash (paren",
];

/// End-to-end harness: fitted parser, mock drift log and router.
pub struct TestHarness {
    pub parser: Arc<HybridParser>,
    pub drift: Arc<MockDriftLog>,
    pub router: Router,
}

impl TestHarness {
    /// Default configuration (threshold 0.7) over the bundled corpus.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self::with_config(ParserConfig {
            confidence_threshold: threshold,
            ..ParserConfig::default()
        })
    }

    pub fn with_config(config: ParserConfig) -> Self {
        let drift = Arc::new(MockDriftLog::new());
        let sink = SerializedDriftLog::new(Arc::clone(&drift));
        let parser = HybridParser::new(&config, &CORPUS, Box::new(sink)).expect("parser fits");
        let state = AppState::new(parser, CORPUS.len());
        let router = build_router(state.clone());
        Self {
            parser: state.parser,
            drift,
            router,
        }
    }

    /// POST /parse and return the status and JSON body.
    pub async fn post_parse(&self, query: &str) -> (StatusCode, serde_json::Value) {
        let body = serde_json::json!({ "query": query });
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post("/parse")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    /// GET `path` and return the status and JSON body.
    pub async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }
}
