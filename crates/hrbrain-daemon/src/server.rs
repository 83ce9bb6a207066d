//! Feedback API - axum router and handlers
//!
//! One route does real work: POST /api/v1/feedback runs a single agent
//! ingestion under one async mutex, so concurrent requests serialize
//! around the whole read-select-update sequence and every event sees the
//! tracker exactly as the previous event left it.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use validator::Validate;

use hrbrain_core::{FeedbackEvent, HrBrainError};
use hrbrain_rl::{Agent, State as PolicyState};

use crate::audit::{AuditLog, FeedbackLogRow};
use crate::config::Config;
use crate::summary::Summarizer;
use crate::validation::{ValidatedJson, MAX_COMMENT_LEN, MAX_ID_LEN};
use crate::webhook::{WebhookClient, WebhookPayload};

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub agent: Arc<Mutex<Agent<StdRng>>>,
    pub summarizer: Arc<Summarizer>,
    pub webhook: WebhookClient,
    pub audit: Arc<AuditLog>,
    pub started_at: DateTime<Utc>,
}

/// Create the API router with state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/status", get(get_status))
        .route("/api/v1/feedback", post(update_feedback))
        .route("/api/v1/policy", get(get_policy))
        .route("/api/v1/history", get(get_history))
        .route("/api/v1/snapshot", post(save_snapshot))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// API Request/Response types

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(length(min = 1, max = MAX_ID_LEN))]
    pub candidate_id: String,
    #[validate(length(min = 1, max = MAX_ID_LEN))]
    pub jd_id: String,
    #[validate(range(min = 1.0, max = 5.0))]
    pub feedback_score: f64,
    #[validate(length(max = MAX_COMMENT_LEN))]
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub status: String,
    pub candidate_id: String,
    pub jd_id: String,
    pub policy_action: String,
    pub reward: f64,
    pub state: PolicyState,
    pub next_state: PolicyState,
    pub updated_q: f64,
    pub cumulative_reward: f64,
    pub feedback_summary: String,
}

/// Error wrapper mapping the core taxonomy onto HTTP statuses
struct ApiError(HrBrainError);

impl From<HrBrainError> for ApiError {
    fn from(err: HrBrainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            HrBrainError::MissingProfile(_) => StatusCode::NOT_FOUND,
            HrBrainError::InvalidFeedback(_) => StatusCode::BAD_REQUEST,
            HrBrainError::Provider(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "status": "error",
            "error": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

// API handlers

async fn health_check() -> &'static str {
    "OK"
}

async fn get_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let agent = state.agent.lock().await;
    let stats = agent.stats();

    Json(serde_json::json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at,
        "stats": stats,
    }))
}

async fn update_feedback(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let event = FeedbackEvent::new(
        request.candidate_id.as_str(),
        request.jd_id.as_str(),
        request.feedback_score,
        request.comment.as_str(),
    );

    // Single mutual-exclusion boundary around the whole ingestion.
    let outcome = {
        let mut agent = state.agent.lock().await;
        agent.ingest_feedback(&event)?
    };

    info!(
        candidate = %event.candidate_id,
        job = %event.job_id,
        action = %outcome.action,
        reward = outcome.reward,
        "feedback processed"
    );

    // Everything below runs after the agent committed: failures here are
    // reported but never retract the update.
    let summary = state
        .summarizer
        .summarize(
            event.candidate_id.as_str(),
            event.job_id.as_str(),
            &event.comment,
            event.feedback_score,
        )
        .await;

    let log_row = FeedbackLogRow {
        candidate_id: event.candidate_id.as_str(),
        jd_id: event.job_id.as_str(),
        feedback_score: event.feedback_score,
        comment: &event.comment,
        feedback_summary: &summary,
        policy_action: &outcome.action.to_string(),
    };
    if let Err(e) = state.audit.append(&log_row) {
        warn!("failed to append feedback log: {e}");
    }

    if state.webhook.enabled() {
        let webhook = state.webhook.clone();
        let payload = WebhookPayload {
            candidate_id: event.candidate_id.to_string(),
            jd_id: event.job_id.to_string(),
            feedback_score: event.feedback_score,
            comment: event.comment.clone(),
            summary: summary.clone(),
            policy_action: outcome.action.to_string(),
        };
        tokio::spawn(async move {
            webhook.notify(&payload).await;
        });
    }

    Ok(Json(FeedbackResponse {
        status: "updated_and_summarized".to_string(),
        candidate_id: event.candidate_id.to_string(),
        jd_id: event.job_id.to_string(),
        policy_action: outcome.action.to_string(),
        reward: outcome.reward,
        state: outcome.state,
        next_state: outcome.next_state,
        updated_q: outcome.updated_q,
        cumulative_reward: outcome.cumulative_reward,
        feedback_summary: summary,
    }))
}

async fn get_policy(State(state): State<AppState>) -> Json<serde_json::Value> {
    let agent = state.agent.lock().await;
    let rows: Vec<serde_json::Value> = agent
        .policy()
        .rows()
        .map(|(policy_state, row)| {
            serde_json::json!({
                "state": policy_state,
                "q": row,
            })
        })
        .collect();

    Json(serde_json::json!({
        "alpha": agent.policy().alpha(),
        "gamma": agent.policy().gamma(),
        "epsilon": agent.policy().epsilon(),
        "rows": rows,
    }))
}

async fn get_history(State(state): State<AppState>) -> Json<serde_json::Value> {
    let agent = state.agent.lock().await;
    Json(serde_json::json!({
        "events": agent.history(),
    }))
}

async fn save_snapshot(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let path = &state.config.data.snapshot_path;
    if path.is_empty() {
        return Ok(Json(serde_json::json!({
            "saved": false,
            "reason": "snapshot persistence disabled",
        })));
    }

    let snapshot = {
        let agent = state.agent.lock().await;
        agent.snapshot()
    };

    crate::snapshot::save(path, &snapshot)
        .map_err(|e| ApiError(HrBrainError::Snapshot(e.to_string())))?;

    Ok(Json(serde_json::json!({
        "saved": true,
        "path": path,
    })))
}
