//! Episodic batch trainer
//!
//! Warm-starts a policy table from a fixed roster of states with known
//! per-action rewards, before any live feedback arrives. Each episode
//! draws a random roster state, picks an action epsilon-greedily, and
//! applies the standard update with the same row as the next state.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::policy::PolicyTable;
use crate::state::{State, ACTION_COUNT};

/// Default number of training episodes
pub const DEFAULT_EPISODES: usize = 1000;

/// Discount factor conventionally used for batch pre-training
pub const BATCH_GAMMA: f64 = 0.9;

/// One roster entry: a state and the reward each action earns in it
#[derive(Debug, Clone)]
pub struct TrainingState {
    pub state: State,
    pub action_rewards: [f64; ACTION_COUNT],
}

/// Batch trainer over a fixed state roster.
///
/// Carries its own discount factor: pre-training conventionally runs
/// gamma 0.9 even when the online table discounts at 0.6.
#[derive(Debug, Clone)]
pub struct EpisodicTrainer {
    episodes: usize,
    gamma: f64,
}

impl EpisodicTrainer {
    pub fn new(episodes: usize, gamma: f64) -> Self {
        Self { episodes, gamma }
    }

    /// Run the configured number of episodes against `table`, mutating it
    /// in place. Returns the total reward collected.
    pub fn train<R: Rng>(&self, table: &mut PolicyTable, roster: &[TrainingState], rng: &mut R) -> f64 {
        if roster.is_empty() {
            return 0.0;
        }

        let mut total_reward = 0.0;
        for _ in 0..self.episodes {
            // choose() on a non-empty slice never returns None
            let Some(entry) = roster.choose(rng) else {
                break;
            };

            let action = table.select_action(entry.state, rng);
            let reward = entry.action_rewards[action.to_index()];
            total_reward += reward;

            table.update_with(entry.state, action, reward, entry.state, table.alpha(), self.gamma);
        }

        info!(
            episodes = self.episodes,
            roster = roster.len(),
            total_reward,
            "episodic pre-training complete"
        );
        total_reward
    }
}

impl Default for EpisodicTrainer {
    fn default() -> Self {
        Self::new(DEFAULT_EPISODES, BATCH_GAMMA)
    }
}

/// Roster mirroring the hiring domain: strong matches reward accept,
/// weak matches reward reject, middling ones reward neither.
pub fn default_roster() -> Vec<TrainingState> {
    let mut roster = Vec::new();
    for (match_level, rewards) in [
        (2u8, [1.0, -1.0, 0.0]),
        (1u8, [-1.0, -1.0, 0.0]),
        (0u8, [-1.0, 1.0, 0.0]),
    ] {
        roster.push(TrainingState {
            state: State {
                match_level,
                sentiment_level: 1,
                prev_reward_level: 1,
                history_level: 0,
            },
            action_rewards: rewards,
        });
    }
    roster
}
