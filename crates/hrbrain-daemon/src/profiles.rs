//! CSV-backed candidate and job profile store

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use hrbrain_core::{CandidateId, JobId};
use hrbrain_rl::ProfileSource;

#[derive(Debug, Deserialize)]
struct CvRecord {
    candidate_id: String,
    skills: String,
}

#[derive(Debug, Deserialize)]
struct JdRecord {
    jd_id: String,
    description: String,
}

/// In-memory profile store loaded from two CSV files at startup.
///
/// `cvs.csv` carries candidate_id,skills rows; `jds.csv` carries
/// jd_id,description rows. Lookups after load are infallible map reads,
/// so a missing id cleanly maps to the agent's MissingProfile error.
pub struct CsvProfileStore {
    candidates: HashMap<String, String>,
    jobs: HashMap<String, String>,
}

impl CsvProfileStore {
    pub fn load(cvs_path: impl AsRef<Path>, jds_path: impl AsRef<Path>) -> Result<Self> {
        let cvs_path = cvs_path.as_ref();
        let jds_path = jds_path.as_ref();

        let mut candidates = HashMap::new();
        let mut reader = csv::Reader::from_path(cvs_path)
            .with_context(|| format!("Failed to open CV file {}", cvs_path.display()))?;
        for record in reader.deserialize() {
            let record: CvRecord =
                record.with_context(|| format!("Malformed row in {}", cvs_path.display()))?;
            candidates.insert(record.candidate_id, record.skills);
        }

        let mut jobs = HashMap::new();
        let mut reader = csv::Reader::from_path(jds_path)
            .with_context(|| format!("Failed to open JD file {}", jds_path.display()))?;
        for record in reader.deserialize() {
            let record: JdRecord =
                record.with_context(|| format!("Malformed row in {}", jds_path.display()))?;
            jobs.insert(record.jd_id, record.description);
        }

        info!(
            candidates = candidates.len(),
            jobs = jobs.len(),
            "profile store loaded"
        );

        Ok(Self { candidates, jobs })
    }

    /// Build from already-loaded text maps (tests, embedded use)
    pub fn from_maps(candidates: HashMap<String, String>, jobs: HashMap<String, String>) -> Self {
        Self { candidates, jobs }
    }

    /// All profile texts, candidate and job alike. The similarity scorer
    /// fits its document frequencies over this corpus.
    pub fn corpus(&self) -> Vec<&str> {
        self.candidates
            .values()
            .chain(self.jobs.values())
            .map(String::as_str)
            .collect()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

impl ProfileSource for CsvProfileStore {
    fn candidate_text(&self, id: &CandidateId) -> Option<String> {
        self.candidates.get(id.as_str()).cloned()
    }

    fn job_text(&self, id: &JobId) -> Option<String> {
        self.jobs.get(id.as_str()).cloned()
    }
}
