//! HRBrain RL - Tabular Q-learning for hiring recommendations
//!
//! This crate implements the online learning core: a discretized state
//! encoder, a fixed reward model over human feedback scores, a dense
//! 54-state Q-table with epsilon-greedy selection, per-pair feedback
//! memory, and the agent that ties one feedback event to one table update.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]

pub mod agent;
pub mod policy;
pub mod reward;
pub mod state;
pub mod tracker;
pub mod trainer;

pub use agent::{Agent, AgentSnapshot, AgentStats, HistoryRecord, IngestOutcome};
pub use agent::{MatchScorer, ProfileSource, SentimentScorer};
pub use policy::PolicyTable;
pub use reward::{compute_reward, Outcome};
pub use state::{Action, Reward, State};
pub use tracker::{PairEntry, PairTracker};
pub use trainer::EpisodicTrainer;
