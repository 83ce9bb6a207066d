//! Common types used throughout HRBrain

use serde::{Deserialize, Serialize};

use crate::error::{HrBrainError, Result};

/// Lowest accepted feedback score (inclusive)
pub const MIN_FEEDBACK_SCORE: f64 = 1.0;
/// Highest accepted feedback score (inclusive)
pub const MAX_FEEDBACK_SCORE: f64 = 5.0;

/// Candidate identifier, as supplied by the profile store (e.g. "CV1")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Job description identifier (e.g. "JD1")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Key for one candidate-job pairing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub candidate: CandidateId,
    pub job: JobId,
}

impl PairKey {
    pub fn new(candidate: CandidateId, job: JobId) -> Self {
        Self { candidate, job }
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.candidate, self.job)
    }
}

/// One human feedback event for a candidate-job pair.
///
/// Immutable once received; `feedback_score` is the 1..=5 rating from the
/// reviewer, `comment` the free-text remark the sentiment provider scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub feedback_score: f64,
    pub comment: String,
}

impl FeedbackEvent {
    pub fn new(
        candidate_id: impl Into<CandidateId>,
        job_id: impl Into<JobId>,
        feedback_score: f64,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            job_id: job_id.into(),
            feedback_score,
            comment: comment.into(),
        }
    }

    /// The pair this event belongs to
    pub fn pair(&self) -> PairKey {
        PairKey::new(self.candidate_id.clone(), self.job_id.clone())
    }

    /// Reject malformed events before any processing happens
    pub fn validate(&self) -> Result<()> {
        if self.candidate_id.as_str().trim().is_empty() {
            return Err(HrBrainError::InvalidFeedback(
                "candidate_id must not be empty".to_string(),
            ));
        }
        if self.job_id.as_str().trim().is_empty() {
            return Err(HrBrainError::InvalidFeedback(
                "jd_id must not be empty".to_string(),
            ));
        }
        if !self.feedback_score.is_finite()
            || self.feedback_score < MIN_FEEDBACK_SCORE
            || self.feedback_score > MAX_FEEDBACK_SCORE
        {
            return Err(HrBrainError::InvalidFeedback(format!(
                "feedback_score {} outside {MIN_FEEDBACK_SCORE}..={MAX_FEEDBACK_SCORE}",
                self.feedback_score
            )));
        }
        Ok(())
    }
}

impl From<&str> for PairKey {
    /// Parse a "candidate/job" pair string; everything after the first '/'
    /// is the job id.
    fn from(s: &str) -> Self {
        match s.split_once('/') {
            Some((c, j)) => Self::new(CandidateId::from(c), JobId::from(j)),
            None => Self::new(CandidateId::from(s), JobId::new("")),
        }
    }
}
