//! State and Action types for the hiring policy

use serde::{Deserialize, Serialize};

/// Reward value from the reward model, one of {-1.0, 0.0, +1.0}
pub type Reward = f64;

/// Number of discrete states (3 match x 3 sentiment x 3 prev-reward x 2 history)
pub const STATE_COUNT: usize = 54;

/// Number of actions
pub const ACTION_COUNT: usize = 3;

/// Match-score thresholds: below the first is Low, below the second Medium
const MATCH_THRESHOLDS: (f64, f64) = (0.2, 0.5);

/// Sentiment-polarity thresholds: below the first is Negative, below the
/// second Neutral
const SENTIMENT_THRESHOLDS: (f64, f64) = (-0.1, 0.1);

/// Reconsideration count at which the history component flips to 1
const HISTORY_THRESHOLD: u32 = 2;

/// Recommended next step for a candidate-job pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Move the candidate forward
    Accept,
    /// Turn the candidate down
    Reject,
    /// Defer: neither commit nor turn down, tracked cumulatively per pair
    Reconsider,
}

/// All actions, in index order. Index IS the table column, so order matters.
pub const ACTIONS: [Action; ACTION_COUNT] = [Action::Accept, Action::Reject, Action::Reconsider];

impl Action {
    /// Column index into a policy table row
    pub fn to_index(self) -> usize {
        match self {
            Action::Accept => 0,
            Action::Reject => 1,
            Action::Reconsider => 2,
        }
    }

    /// Create an action from its column index
    pub fn from_index(index: usize) -> Option<Self> {
        ACTIONS.get(index).copied()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Accept => write!(f, "accept"),
            Action::Reject => write!(f, "reject"),
            Action::Reconsider => write!(f, "reconsider"),
        }
    }
}

/// Discretized state for one candidate-job pair.
///
/// Each component is a small integer band; the tuple is the exact table
/// index, so no hashing or collision handling is involved. Encoding is a
/// pure function of its inputs and is recomputed fresh for every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StateRepr")]
pub struct State {
    /// Text-similarity band: 0 Low, 1 Medium, 2 High
    pub match_level: u8,
    /// Comment polarity band: 0 Negative, 1 Neutral, 2 Positive
    pub sentiment_level: u8,
    /// Last stored reward shifted into 0..=2 (seed -1/0/+1 -> 0/1/2)
    pub prev_reward_level: u8,
    /// 1 once the pair has been reconsidered twice, else 0
    pub history_level: u8,
}

/// Wire form of a state, validated into `State` so restored snapshots
/// can never carry out-of-band component levels.
#[derive(Debug, Deserialize)]
struct StateRepr {
    match_level: u8,
    sentiment_level: u8,
    prev_reward_level: u8,
    history_level: u8,
}

impl TryFrom<StateRepr> for State {
    type Error = String;

    fn try_from(repr: StateRepr) -> Result<Self, Self::Error> {
        if repr.match_level > 2
            || repr.sentiment_level > 2
            || repr.prev_reward_level > 2
            || repr.history_level > 1
        {
            return Err(format!(
                "state component out of band: ({},{},{},{})",
                repr.match_level, repr.sentiment_level, repr.prev_reward_level, repr.history_level
            ));
        }
        Ok(Self {
            match_level: repr.match_level,
            sentiment_level: repr.sentiment_level,
            prev_reward_level: repr.prev_reward_level,
            history_level: repr.history_level,
        })
    }
}

impl State {
    /// Discretize continuous signals into a state tuple.
    ///
    /// `match_score` is a similarity in [0,1], `sentiment` a polarity
    /// typically in [-1,1], `prev_reward` the last reward stored for the
    /// pair (one of -1/0/+1 by construction), `reconsider_count` the
    /// pair's cumulative reconsideration counter.
    pub fn encode(match_score: f64, sentiment: f64, prev_reward: f64, reconsider_count: u32) -> Self {
        let match_level = if match_score < MATCH_THRESHOLDS.0 {
            0
        } else if match_score < MATCH_THRESHOLDS.1 {
            1
        } else {
            2
        };

        let sentiment_level = if sentiment < SENTIMENT_THRESHOLDS.0 {
            0
        } else if sentiment < SENTIMENT_THRESHOLDS.1 {
            1
        } else {
            2
        };

        // Stored rewards are always -1/0/+1; clamp guards out-of-band seeds
        // in restored snapshots.
        let prev_reward_level = ((prev_reward.round() as i64) + 1).clamp(0, 2) as u8;

        let history_level = u8::from(reconsider_count >= HISTORY_THRESHOLD);

        Self {
            match_level,
            sentiment_level,
            prev_reward_level,
            history_level,
        }
    }

    /// Flat offset into a dense `STATE_COUNT`-row table
    pub fn index(self) -> usize {
        let m = self.match_level as usize;
        let s = self.sentiment_level as usize;
        let p = self.prev_reward_level as usize;
        let h = self.history_level as usize;
        ((m * 3 + s) * 3 + p) * 2 + h
    }

    /// Rebuild a state from its flat offset
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= STATE_COUNT {
            return None;
        }
        let h = index % 2;
        let p = (index / 2) % 3;
        let s = (index / 6) % 3;
        let m = index / 18;
        Some(Self {
            match_level: m as u8,
            sentiment_level: s as u8,
            prev_reward_level: p as u8,
            history_level: h as u8,
        })
    }

    /// The tuple as plain integers, for audit records and API responses
    pub fn as_tuple(self) -> (u8, u8, u8, u8) {
        (
            self.match_level,
            self.sentiment_level,
            self.prev_reward_level,
            self.history_level,
        )
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{},{},{})",
            self.match_level, self.sentiment_level, self.prev_reward_level, self.history_level
        )
    }
}
