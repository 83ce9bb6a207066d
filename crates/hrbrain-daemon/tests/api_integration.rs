//! Integration tests for the HRBrain daemon API
//!
//! These drive the real router and handlers in-process with axum-test,
//! backed by an in-memory profile store and disabled collaborators.

#![allow(clippy::float_cmp)]

use std::collections::HashMap;
use std::sync::Arc;

use axum_test::TestServer;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use hrbrain_daemon::audit::AuditLog;
use hrbrain_daemon::config::Config;
use hrbrain_daemon::profiles::CsvProfileStore;
use hrbrain_daemon::sentiment::LexiconSentiment;
use hrbrain_daemon::server::{create_router, AppState};
use hrbrain_daemon::similarity::TfIdfScorer;
use hrbrain_daemon::summary::Summarizer;
use hrbrain_daemon::webhook::WebhookClient;
use hrbrain_rl::{Agent, PolicyTable};

/// Server over one agent with greedy (epsilon 0) selection and a seeded
/// random source, so responses are deterministic.
fn test_server(dir: &tempfile::TempDir) -> TestServer {
    let candidates = HashMap::from([
        ("C1".to_string(), "rust backend tokio axum".to_string()),
        ("C2".to_string(), "watercolor landscapes".to_string()),
    ]);
    let jobs = HashMap::from([(
        "J1".to_string(),
        "rust backend tokio axum engineer".to_string(),
    )]);

    let profiles = CsvProfileStore::from_maps(candidates, jobs);
    let matcher = TfIdfScorer::fit(&profiles.corpus());

    let agent = Agent::with_rng(
        PolicyTable::new(0.1, 0.6, 0.0),
        Arc::new(profiles),
        Arc::new(matcher),
        Arc::new(LexiconSentiment::new()),
        StdRng::seed_from_u64(1),
    );

    let mut config = Config::default();
    config.data.snapshot_path = dir
        .path()
        .join("agent_snapshot.json")
        .to_string_lossy()
        .to_string();
    config.data.feedback_log_path = dir
        .path()
        .join("feedback_log.csv")
        .to_string_lossy()
        .to_string();

    let state = AppState {
        config: Arc::new(config.clone()),
        agent: Arc::new(Mutex::new(agent)),
        summarizer: Arc::new(Summarizer::new(config.summarizer.clone())),
        webhook: WebhookClient::new(config.webhook.clone()),
        audit: Arc::new(AuditLog::new(&config.data.feedback_log_path)),
        started_at: Utc::now(),
    };

    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_status_reports_fresh_agent() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let response = server.get("/api/v1/status").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "running");
    assert_eq!(body["stats"]["events_ingested"], 0);
    assert_eq!(body["stats"]["cumulative_reward"], 0.0);
}

#[tokio::test]
async fn test_feedback_first_ingestion() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let response = server
        .post("/api/v1/feedback")
        .json(&json!({
            "candidate_id": "C1",
            "jd_id": "J1",
            "feedback_score": 5.0,
            "comment": "Great culture fit"
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "updated_and_summarized");
    assert_eq!(body["policy_action"], "accept");
    assert_eq!(body["reward"], 1.0);
    // Strong match, positive comment, neutral prior, no history.
    assert_eq!(body["state"]["match_level"], 2);
    assert_eq!(body["state"]["sentiment_level"], 2);
    assert_eq!(body["state"]["prev_reward_level"], 1);
    assert_eq!(body["state"]["history_level"], 0);
    assert!((body["updated_q"].as_f64().unwrap() - 0.1).abs() < 1e-12);
    assert!(!body["feedback_summary"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_feedback_second_ingestion_shifts_state() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let payload = json!({
        "candidate_id": "C1",
        "jd_id": "J1",
        "feedback_score": 5.0,
        "comment": "Great culture fit"
    });

    server.post("/api/v1/feedback").json(&payload).await.assert_status_ok();
    let response = server.post("/api/v1/feedback").json(&payload).await;
    response.assert_status_ok();

    let body: Value = response.json();
    // The tracker now carries the +1 reward from the first event.
    assert_eq!(body["state"]["prev_reward_level"], 2);
    assert_eq!(body["cumulative_reward"], 2.0);
}

#[tokio::test]
async fn test_feedback_unknown_candidate_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let response = server
        .post("/api/v1/feedback")
        .json(&json!({
            "candidate_id": "C404",
            "jd_id": "J1",
            "feedback_score": 5.0,
            "comment": "who?"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);

    // Failed ingestion must leave no visible state change.
    let status: Value = server.get("/api/v1/status").await.json();
    assert_eq!(status["stats"]["events_ingested"], 0);
}

#[tokio::test]
async fn test_feedback_invalid_score_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let response = server
        .post("/api/v1/feedback")
        .json(&json!({
            "candidate_id": "C1",
            "jd_id": "J1",
            "feedback_score": 9.0,
            "comment": "off the chart"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_missing_field_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let response = server
        .post("/api/v1/feedback")
        .json(&json!({
            "candidate_id": "C1",
            "feedback_score": 4.0
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_policy_endpoint_exposes_all_rows() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let body: Value = server.get("/api/v1/policy").await.json();
    assert_eq!(body["alpha"], 0.1);
    assert_eq!(body["gamma"], 0.6);
    assert_eq!(body["rows"].as_array().unwrap().len(), 54);
}

#[tokio::test]
async fn test_history_grows_with_feedback() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let body: Value = server.get("/api/v1/history").await.json();
    assert_eq!(body["events"].as_array().unwrap().len(), 0);

    server
        .post("/api/v1/feedback")
        .json(&json!({
            "candidate_id": "C1",
            "jd_id": "J1",
            "feedback_score": 2.0,
            "comment": "some doubts"
        }))
        .await
        .assert_status_ok();

    let body: Value = server.get("/api/v1/history").await.json();
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["candidate_id"], "C1");
}

#[tokio::test]
async fn test_snapshot_endpoint_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    server
        .post("/api/v1/feedback")
        .json(&json!({
            "candidate_id": "C1",
            "jd_id": "J1",
            "feedback_score": 5.0,
            "comment": "good"
        }))
        .await
        .assert_status_ok();

    let response = server.post("/api/v1/snapshot").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["saved"], true);

    let snapshot = hrbrain_daemon::snapshot::load(dir.path().join("agent_snapshot.json"))
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.cumulative_reward, 1.0);
}

#[tokio::test]
async fn test_audit_log_written_after_commit() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    server
        .post("/api/v1/feedback")
        .json(&json!({
            "candidate_id": "C1",
            "jd_id": "J1",
            "feedback_score": 5.0,
            "comment": "good"
        }))
        .await
        .assert_status_ok();

    let content = std::fs::read_to_string(dir.path().join("feedback_log.csv")).unwrap();
    assert!(content.contains("candidate_id,jd_id"));
    assert!(content.contains("C1,J1,5.0"));
}
