//! E2E tests for the HTTP service over the fitted parser.

mod helpers;

use axum::http::StatusCode;

use logq_api::routes::parse::MAX_QUERY_CHARS;

use helpers::{CORPUS, TestHarness};

#[tokio::test]
async fn e2e_health_reports_corpus_size() {
    let h = TestHarness::new();
    let (status, json) = h.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["corpus_size"], CORPUS.len());
    assert_eq!(json["corpus_size"], 360);
}

#[tokio::test]
async fn e2e_index_reports_threshold() {
    let h = TestHarness::with_threshold(0.85);
    let (status, json) = h.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["service"], "logq");
    assert_eq!(json["confidence_threshold"], 0.85);
}

#[tokio::test]
async fn e2e_parse_canonical_request() {
    let h = TestHarness::new();
    let text = "show failed logins from yesterday from auth by user alice";
    let (status, json) = h.post_parse(text).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], text);
    assert_eq!(json["slots"]["action"], "failure");
    assert_eq!(json["slots"]["time"], "last24h");
    assert_eq!(json["slots"]["user"], "alice");
    assert_eq!(json["slots"]["source"], "auth");

    let spl = json["spl"].as_str().unwrap();
    assert!(spl.starts_with("index=security sourcetype=linux_secure"), "{spl}");
    assert!(spl.contains(r#"user="alice""#));
    assert!(spl.contains("earliest=-24h latest=now"));

    // The HTTP answer matches a direct forced parse of the same text.
    let direct = h.parser.parse_forced(text);
    assert_eq!(spl, direct.query);
    assert_eq!(json["drift_logged"], direct.drift_written);
}

#[tokio::test]
async fn e2e_parse_empty_query_logs_drift() {
    let h = TestHarness::new();
    let (status, json) = h.post_parse("").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["spl"], "index=*");
    assert_eq!(json["drift_logged"], true);
    for slot in ["action", "time", "user", "source"] {
        assert_eq!(json["slots"][slot], "*");
        assert_eq!(json["authority"][slot], "rule");
    }
    assert_eq!(h.drift.len(), 1);
}

#[tokio::test]
async fn e2e_parse_oversized_query_rejected() {
    let h = TestHarness::new();
    let text = "a".repeat(MAX_QUERY_CHARS + 1);
    let (status, json) = h.post_parse(&text).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("exceeds"));
    assert!(h.drift.is_empty());
}

#[tokio::test]
async fn e2e_concurrent_requests_each_log_once() {
    let h = TestHarness::new();
    let mut tasks = Vec::new();
    for _ in 0..16 {
        let router = h.router.clone();
        tasks.push(tokio::spawn(async move {
            use axum::body::Body;
            use axum::http::Request;
            use tower::ServiceExt;

            let response = router
                .oneshot(
                    Request::post("/parse")
                        .header("content-type", "application/json")
                        .body(Body::from(r#"{"query":""}"#))
                        .unwrap(),
                )
                .await
                .unwrap();
            response.status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(h.drift.len(), 16);
}
