//! Error types for HRBrain

use thiserror::Error;

/// Main error type for HRBrain
#[derive(Error, Debug)]
pub enum HrBrainError {
    /// Candidate or job id not present in the profile store. Raised before
    /// any policy or tracker mutation, so a failed ingestion leaves no trace.
    #[error("Missing profile: {0}")]
    MissingProfile(String),

    /// Feedback event rejected before processing (score out of range,
    /// missing fields).
    #[error("Invalid feedback: {0}")]
    InvalidFeedback(String),

    /// A collaborator (similarity or sentiment provider) failed. The whole
    /// ingestion fails; table and tracker are left untouched.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for HRBrain operations
pub type Result<T> = std::result::Result<T, HrBrainError>;
