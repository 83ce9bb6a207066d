//! HRBrain Core - Shared types, errors, and identifiers
//!
//! This crate provides the foundational types used across all HRBrain
//! components: candidate/job identifiers, feedback events, and the
//! common error taxonomy.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

pub use error::{HrBrainError, Result};
pub use types::{CandidateId, FeedbackEvent, JobId, PairKey};
