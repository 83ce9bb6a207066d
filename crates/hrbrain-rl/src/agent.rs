//! Agent orchestrator - one feedback event in, one policy update out
//!
//! The agent owns the policy table, the pair tracker, and the audit
//! history explicitly. There are no module-level singletons: callers
//! construct as many independent agents as they need (one per tenant,
//! one per test) and hold the handle themselves.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use hrbrain_core::{CandidateId, FeedbackEvent, HrBrainError, JobId, Result};

use crate::policy::PolicyTable;
use crate::reward::compute_reward;
use crate::state::{Action, Reward, State};
use crate::tracker::PairTracker;

/// Keyed lookup of candidate skill text and job description text.
/// Backed by any tabular or key-value store; the agent only needs the
/// two operations below.
pub trait ProfileSource: Send + Sync {
    fn candidate_text(&self, id: &CandidateId) -> Option<String>;
    fn job_text(&self, id: &JobId) -> Option<String>;
}

/// Text-similarity collaborator: candidate profile vs job description,
/// returning a match score in [0,1].
pub trait MatchScorer: Send + Sync {
    fn score(&self, candidate_text: &str, job_text: &str) -> Result<f64>;
}

/// Sentiment collaborator: free text to a polarity, conventionally in [-1,1].
pub trait SentimentScorer: Send + Sync {
    fn polarity(&self, text: &str) -> Result<f64>;
}

/// Append-only audit record for one processed feedback event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub state: State,
    pub action: Action,
    pub reward: Reward,
    pub cumulative_reward: f64,
    pub feedback_score: f64,
    pub comment: String,
    pub recorded_at: DateTime<Utc>,
}

/// Caller-visible result of one ingestion
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub action: Action,
    pub reward: Reward,
    pub state: State,
    pub next_state: State,
    pub updated_q: f64,
    pub cumulative_reward: f64,
}

/// Agent statistics for status endpoints
#[derive(Debug, Clone, Serialize)]
pub struct AgentStats {
    pub events_ingested: usize,
    pub cumulative_reward: f64,
    pub average_reward: f64,
    pub pairs_tracked: usize,
    pub visited_cells: usize,
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
}

/// Serializable state of an agent, for external persistence across
/// restarts: the full table, the pair map, and the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub policy: PolicyTable,
    pub tracker: PairTracker,
    pub history: Vec<HistoryRecord>,
    pub cumulative_reward: f64,
}

/// The online Q-learning agent.
///
/// Generic over the random source so tests inject a seeded generator;
/// production code uses `StdRng` from entropy.
pub struct Agent<R: Rng = StdRng> {
    policy: PolicyTable,
    tracker: PairTracker,
    history: Vec<HistoryRecord>,
    cumulative_reward: f64,
    profiles: Arc<dyn ProfileSource>,
    matcher: Arc<dyn MatchScorer>,
    sentiment: Arc<dyn SentimentScorer>,
    rng: R,
}

impl Agent<StdRng> {
    pub fn new(
        policy: PolicyTable,
        profiles: Arc<dyn ProfileSource>,
        matcher: Arc<dyn MatchScorer>,
        sentiment: Arc<dyn SentimentScorer>,
    ) -> Self {
        Self::with_rng(policy, profiles, matcher, sentiment, StdRng::from_entropy())
    }
}

impl<R: Rng> Agent<R> {
    pub fn with_rng(
        policy: PolicyTable,
        profiles: Arc<dyn ProfileSource>,
        matcher: Arc<dyn MatchScorer>,
        sentiment: Arc<dyn SentimentScorer>,
        rng: R,
    ) -> Self {
        Self {
            policy,
            tracker: PairTracker::new(),
            history: Vec::new(),
            cumulative_reward: 0.0,
            profiles,
            matcher,
            sentiment,
            rng,
        }
    }

    /// Process one feedback event and advance the policy by exactly one
    /// update.
    ///
    /// Everything that can fail (validation, profile lookup, the two
    /// provider calls) happens before the first mutation, so a returned
    /// error means table, tracker, and history are untouched. After the
    /// first mutation nothing can fail: the ingestion is applied in full
    /// or not at all.
    pub fn ingest_feedback(&mut self, event: &FeedbackEvent) -> Result<IngestOutcome> {
        event.validate()?;

        let candidate_text = self
            .profiles
            .candidate_text(&event.candidate_id)
            .ok_or_else(|| {
                HrBrainError::MissingProfile(format!("candidate {}", event.candidate_id))
            })?;
        let job_text = self
            .profiles
            .job_text(&event.job_id)
            .ok_or_else(|| HrBrainError::MissingProfile(format!("job {}", event.job_id)))?;

        let match_score = self.matcher.score(&candidate_text, &job_text)?;
        let polarity = self.sentiment.polarity(&event.comment)?;

        let pair = event.pair();

        // S from pre-event memory
        let before = self.tracker.entry(&pair);
        let state = State::encode(
            match_score,
            polarity,
            before.prev_reward,
            before.reconsider_count,
        );

        let action = self.policy.select_action(state, &mut self.rng);
        let reward = compute_reward(action, event.feedback_score);

        self.tracker.record_outcome(&pair, reward, action);

        // S' from post-event memory. The text-derived components are
        // identical by construction, so S' can differ from S only in the
        // prev-reward and history components.
        let after = self.tracker.entry(&pair);
        let next_state = State::encode(
            match_score,
            polarity,
            after.prev_reward,
            after.reconsider_count,
        );

        let updated_q = self.policy.update(state, action, reward, next_state);
        self.cumulative_reward += reward;

        self.history.push(HistoryRecord {
            id: Uuid::new_v4(),
            candidate_id: event.candidate_id.clone(),
            job_id: event.job_id.clone(),
            state,
            action,
            reward,
            cumulative_reward: self.cumulative_reward,
            feedback_score: event.feedback_score,
            comment: event.comment.clone(),
            recorded_at: Utc::now(),
        });

        debug!(
            pair = %pair,
            state = %state,
            next_state = %next_state,
            action = %action,
            reward,
            updated_q,
            "feedback ingested"
        );

        Ok(IngestOutcome {
            action,
            reward,
            state,
            next_state,
            updated_q,
            cumulative_reward: self.cumulative_reward,
        })
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut PolicyTable {
        &mut self.policy
    }

    pub fn tracker(&self) -> &PairTracker {
        &self.tracker
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn stats(&self) -> AgentStats {
        let events = self.history.len();
        AgentStats {
            events_ingested: events,
            cumulative_reward: self.cumulative_reward,
            average_reward: if events > 0 {
                self.cumulative_reward / events as f64
            } else {
                0.0
            },
            pairs_tracked: self.tracker.len(),
            visited_cells: self.policy.visited_cells(),
            alpha: self.policy.alpha(),
            gamma: self.policy.gamma(),
            epsilon: self.policy.epsilon(),
        }
    }

    /// Capture everything an external persistence layer needs
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            policy: self.policy.clone(),
            tracker: self.tracker.clone(),
            history: self.history.clone(),
            cumulative_reward: self.cumulative_reward,
        }
    }

    /// Replace the agent's learned state with a previously captured
    /// snapshot. Providers and the random source are kept.
    pub fn restore(&mut self, snapshot: AgentSnapshot) {
        self.policy = snapshot.policy;
        self.tracker = snapshot.tracker;
        self.history = snapshot.history;
        self.cumulative_reward = snapshot.cumulative_reward;
    }
}
