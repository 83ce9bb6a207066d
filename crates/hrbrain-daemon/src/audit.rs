//! Append-only CSV feedback log
//!
//! Mirrors the agent's in-memory history onto disk for dashboards and
//! offline analysis. Write failures are surfaced to the caller, which
//! logs them; the ingestion itself has already committed.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// One row of the on-disk feedback log
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackLogRow<'a> {
    pub candidate_id: &'a str,
    pub jd_id: &'a str,
    pub feedback_score: f64,
    pub comment: &'a str,
    pub feedback_summary: &'a str,
    pub policy_action: &'a str,
}

/// CSV appender with header-on-create semantics
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, row: &FeedbackLogRow<'_>) -> Result<()> {
        let exists = self.path.exists();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(!exists)
            .from_writer(file);
        writer
            .serialize(row)
            .context("Failed to serialize feedback row")?;
        writer.flush().context("Failed to flush feedback log")?;
        Ok(())
    }
}
