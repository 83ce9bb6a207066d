//! Per-pair feedback memory

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use hrbrain_core::PairKey;

use crate::state::{Action, Reward};

/// Memory carried forward for one candidate-job pair.
///
/// `prev_reward` is exactly the reward produced by the most recent feedback
/// event for the pair; `reconsider_count` only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PairEntry {
    pub prev_reward: Reward,
    pub reconsider_count: u32,
}

/// Map of all pairs the agent has seen. Entries are created on first
/// sighting and never deleted for the life of the agent.
///
/// Serialized as a list of records: JSON maps require string keys, and the
/// snapshot format should stay greppable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "Vec<TrackedPair>", from = "Vec<TrackedPair>")]
pub struct PairTracker {
    entries: HashMap<PairKey, PairEntry>,
}

/// Snapshot form of one tracker row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedPair {
    pub pair: PairKey,
    #[serde(flatten)]
    pub entry: PairEntry,
}

impl From<PairTracker> for Vec<TrackedPair> {
    fn from(tracker: PairTracker) -> Self {
        tracker
            .entries
            .into_iter()
            .map(|(pair, entry)| TrackedPair { pair, entry })
            .collect()
    }
}

impl From<Vec<TrackedPair>> for PairTracker {
    fn from(rows: Vec<TrackedPair>) -> Self {
        Self {
            entries: rows.into_iter().map(|row| (row.pair, row.entry)).collect(),
        }
    }
}

impl PairTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current memory for a pair, creating a zeroed entry on first access.
    /// A pair queried before any feedback reads as neutral (prev reward 0,
    /// no reconsiderations).
    pub fn entry(&mut self, pair: &PairKey) -> PairEntry {
        *self.entries.entry(pair.clone()).or_default()
    }

    /// Record the outcome of one processed feedback event: the reward
    /// replaces the stored one, and a reconsider action bumps the counter.
    pub fn record_outcome(&mut self, pair: &PairKey, reward: Reward, action: Action) {
        let entry = self.entries.entry(pair.clone()).or_default();
        entry.prev_reward = reward;
        if action == Action::Reconsider {
            entry.reconsider_count += 1;
        }
    }

    /// Number of pairs seen so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view of a pair, without creating an entry
    pub fn peek(&self, pair: &PairKey) -> Option<PairEntry> {
        self.entries.get(pair).copied()
    }
}
