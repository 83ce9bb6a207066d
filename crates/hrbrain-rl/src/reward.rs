//! Reward model over human feedback scores
//!
//! A fixed lookup, not a statistical fit. Note that a neutral outcome
//! scores -1 for both accept and reject: committing either way on
//! lukewarm feedback is penalized.

use serde::{Deserialize, Serialize};

use crate::state::{Action, Reward};

/// Score above which feedback counts as good
const GOOD_SCORE: f64 = 4.0;

/// Score below which feedback counts as bad
const BAD_SCORE: f64 = 2.0;

/// Classified feedback outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Good,
    Bad,
    Neutral,
}

impl Outcome {
    /// Classify a 1..=5 feedback score: >4 good, <2 bad, else neutral
    pub fn from_score(score: f64) -> Self {
        if score > GOOD_SCORE {
            Outcome::Good
        } else if score < BAD_SCORE {
            Outcome::Bad
        } else {
            Outcome::Neutral
        }
    }
}

/// Map a chosen action and an observed feedback score to a reward.
///
/// accept is rewarded only for good outcomes, reject only for bad ones;
/// reconsider is a deliberate no-penalty deferral and always scores 0.
pub fn compute_reward(action: Action, feedback_score: f64) -> Reward {
    let outcome = Outcome::from_score(feedback_score);
    match action {
        Action::Accept => {
            if outcome == Outcome::Good {
                1.0
            } else {
                -1.0
            }
        }
        Action::Reject => {
            if outcome == Outcome::Bad {
                1.0
            } else {
                -1.0
            }
        }
        Action::Reconsider => 0.0,
    }
}
