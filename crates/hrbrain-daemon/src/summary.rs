//! Feedback summarization via an external LLM endpoint
//!
//! Runs strictly after the agent has committed its update: a disabled,
//! slow, or failing summarizer degrades to a canned summary and never
//! fails the ingestion request.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::SummarizerConfig;

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    model: &'a str,
    prompt: String,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
}

/// Client for the summarization collaborator
pub struct Summarizer {
    config: SummarizerConfig,
    client: reqwest::Client,
}

impl Summarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    /// Produce a one-line human-readable summary of the feedback. Always
    /// returns a string; provider problems are logged and replaced with a
    /// fallback.
    pub async fn summarize(
        &self,
        candidate_id: &str,
        jd_id: &str,
        comment: &str,
        feedback_score: f64,
    ) -> String {
        if !self.config.enabled || self.config.endpoint.is_empty() {
            return fallback_summary(candidate_id, jd_id, feedback_score);
        }

        let prompt = format!(
            "HR Feedback Summary Task:\n\
             Candidate ID: {candidate_id}\n\
             Job ID: {jd_id}\n\
             Raw Comment: \"{comment}\"\n\
             Score (1=Bad, 5=Good): {feedback_score}\n\n\
             Analyze the raw comment, determine the core reason for the score, \
             and provide a concise one-sentence summary (max 15 words)."
        );

        let request = SummaryRequest {
            model: &self.config.model,
            prompt,
            temperature: 0.3,
            max_tokens: 150,
        };

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        if let Ok(key) = std::env::var(&self.config.api_key_env) {
            builder = builder.bearer_auth(key);
        }

        match builder.send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<SummaryResponse>().await {
                    Ok(body) if !body.summary.trim().is_empty() => body.summary.trim().to_string(),
                    Ok(_) => {
                        warn!("summarizer returned an empty summary");
                        fallback_summary(candidate_id, jd_id, feedback_score)
                    }
                    Err(e) => {
                        warn!("summarizer response unparseable: {e}");
                        fallback_summary(candidate_id, jd_id, feedback_score)
                    }
                }
            }
            Ok(response) => {
                warn!(status = %response.status(), "summarizer request rejected");
                fallback_summary(candidate_id, jd_id, feedback_score)
            }
            Err(e) => {
                warn!("summarizer request failed: {e}");
                fallback_summary(candidate_id, jd_id, feedback_score)
            }
        }
    }
}

fn fallback_summary(candidate_id: &str, jd_id: &str, feedback_score: f64) -> String {
    format!("Feedback for candidate {candidate_id} on job {jd_id}: score {feedback_score}/5.")
}
