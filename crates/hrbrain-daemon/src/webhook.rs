//! Outbound notification to a downstream automation endpoint
//!
//! Fire-and-forget: the daemon spawns the delivery after the agent's
//! state is committed, and a failed delivery is logged but never rolls
//! back or fails the ingestion.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::WebhookConfig;

/// Payload delivered to the automation endpoint after every ingestion
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub candidate_id: String,
    pub jd_id: String,
    pub feedback_score: f64,
    pub comment: String,
    pub summary: String,
    pub policy_action: String,
}

/// Client for the downstream automation webhook
#[derive(Clone)]
pub struct WebhookClient {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(config: WebhookConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled && !self.config.url.is_empty()
    }

    /// Deliver one payload. Returns whether delivery succeeded; callers
    /// only log the result.
    pub async fn notify(&self, payload: &WebhookPayload) -> bool {
        if !self.enabled() {
            return false;
        }

        match self.client.post(&self.config.url).json(payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!(
                    candidate = %payload.candidate_id,
                    job = %payload.jd_id,
                    "webhook delivered"
                );
                true
            }
            Ok(response) => {
                warn!(status = %response.status(), "webhook rejected");
                false
            }
            Err(e) => {
                warn!("webhook delivery failed: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json_string, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> WebhookPayload {
        WebhookPayload {
            candidate_id: "C1".to_string(),
            jd_id: "J1".to_string(),
            feedback_score: 5.0,
            comment: "great".to_string(),
            summary: "Strong fit.".to_string(),
            policy_action: "accept".to_string(),
        }
    }

    #[tokio::test]
    async fn test_disabled_webhook_is_noop() {
        let client = WebhookClient::new(WebhookConfig::default());
        assert!(!client.enabled());
        assert!(!client.notify(&payload()).await);
    }

    #[tokio::test]
    async fn test_delivery_success() {
        let server = MockServer::start().await;
        let expected = serde_json::to_string(&payload()).unwrap();
        Mock::given(method("POST"))
            .and(body_json_string(expected))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = WebhookClient::new(WebhookConfig {
            enabled: true,
            url: server.uri(),
            timeout_seconds: 5,
        });
        assert!(client.notify(&payload()).await);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = WebhookClient::new(WebhookConfig {
            enabled: true,
            url: server.uri(),
            timeout_seconds: 5,
        });
        assert!(!client.notify(&payload()).await);
    }
}
