//! HRBrain Daemon library - service wiring around the RL agent
//!
//! Exposed as a library so integration tests drive the real router and
//! handlers in-process.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::unused_async)]
#![allow(clippy::module_name_repetitions)]

pub mod audit;
pub mod config;
pub mod daemon;
pub mod profiles;
pub mod sentiment;
pub mod server;
pub mod similarity;
pub mod snapshot;
pub mod summary;
pub mod validation;
pub mod webhook;
