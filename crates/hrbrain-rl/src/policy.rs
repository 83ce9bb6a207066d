//! Dense Q-table with epsilon-greedy action selection

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::state::{Action, Reward, State, ACTION_COUNT, STATE_COUNT};

/// Default learning rate
pub const DEFAULT_ALPHA: f64 = 0.1;
/// Default discount factor for online updates
pub const DEFAULT_GAMMA: f64 = 0.6;
/// Default exploration rate
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Tabular policy: one row of expected values per discrete state.
///
/// All 54 rows are pre-allocated and start at zero; the table is mutated
/// in place by every update and never rolled back. The random source for
/// exploration is supplied by the caller so tests can seed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PolicyTableRepr")]
pub struct PolicyTable {
    q: Vec<[f64; ACTION_COUNT]>,
    alpha: f64,
    gamma: f64,
    epsilon: f64,
}

/// Wire form of a policy table. Validated into `PolicyTable` so a
/// restored snapshot always carries the full matrix; indexing by any
/// encoded state is then infallible.
#[derive(Debug, Deserialize)]
struct PolicyTableRepr {
    q: Vec<[f64; ACTION_COUNT]>,
    alpha: f64,
    gamma: f64,
    epsilon: f64,
}

impl TryFrom<PolicyTableRepr> for PolicyTable {
    type Error = String;

    fn try_from(repr: PolicyTableRepr) -> Result<Self, Self::Error> {
        if repr.q.len() != STATE_COUNT {
            return Err(format!(
                "policy table must have exactly {STATE_COUNT} rows, got {}",
                repr.q.len()
            ));
        }
        if repr.q.iter().flatten().any(|v| !v.is_finite()) {
            return Err("policy table contains a non-finite value".to_string());
        }
        Ok(Self {
            q: repr.q,
            alpha: repr.alpha,
            gamma: repr.gamma,
            epsilon: repr.epsilon,
        })
    }
}

impl PolicyTable {
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Self {
        Self {
            q: vec![[0.0; ACTION_COUNT]; STATE_COUNT],
            alpha,
            gamma,
            epsilon,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The value row for a state
    pub fn row(&self, state: State) -> &[f64; ACTION_COUNT] {
        &self.q[state.index()]
    }

    /// Current estimate for one state-action cell
    pub fn q_value(&self, state: State, action: Action) -> f64 {
        self.q[state.index()][action.to_index()]
    }

    /// Greedy action for a state, first-max tie-break (lowest index wins)
    pub fn greedy(&self, state: State) -> Action {
        let row = self.row(state);
        let mut best = 0;
        for (idx, value) in row.iter().enumerate().skip(1) {
            if *value > row[best] {
                best = idx;
            }
        }
        Action::from_index(best).unwrap_or(Action::Accept)
    }

    /// Epsilon-greedy selection: with probability epsilon a uniformly
    /// random action, otherwise the greedy one.
    pub fn select_action<R: Rng>(&self, state: State, rng: &mut R) -> Action {
        if rng.gen::<f64>() < self.epsilon {
            let idx = rng.gen_range(0..ACTION_COUNT);
            Action::from_index(idx).unwrap_or(Action::Accept)
        } else {
            self.greedy(state)
        }
    }

    /// Best value reachable from a state
    pub fn max_q(&self, state: State) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// One-step Q-learning update:
    /// `Q[s][a] += alpha * (reward + gamma * max(Q[s']) - Q[s][a])`,
    /// using the table's own alpha and gamma. Returns the new cell value.
    pub fn update(&mut self, state: State, action: Action, reward: Reward, next_state: State) -> f64 {
        self.update_with(state, action, reward, next_state, self.alpha, self.gamma)
    }

    /// The update rule with explicit parameters, for trainers that run a
    /// different discount factor than the online one.
    pub fn update_with(
        &mut self,
        state: State,
        action: Action,
        reward: Reward,
        next_state: State,
        alpha: f64,
        gamma: f64,
    ) -> f64 {
        let next_max = self.max_q(next_state);
        let cell = &mut self.q[state.index()][action.to_index()];
        let old = *cell;
        *cell = old + alpha * (reward + gamma * next_max - old);
        trace!(
            state = %state,
            action = %action,
            reward,
            old_q = old,
            new_q = *cell,
            "q-table update"
        );
        *cell
    }

    /// All rows keyed by state, for API snapshots
    pub fn rows(&self) -> impl Iterator<Item = (State, &[f64; ACTION_COUNT])> {
        self.q.iter().enumerate().map(|(idx, row)| {
            let state = State::from_index(idx).unwrap_or(State {
                match_level: 0,
                sentiment_level: 0,
                prev_reward_level: 0,
                history_level: 0,
            });
            (state, row)
        })
    }

    /// Count of cells that have moved away from their zero initialization
    pub fn visited_cells(&self) -> usize {
        self.q
            .iter()
            .flat_map(|row| row.iter())
            .filter(|v| **v != 0.0)
            .count()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA, DEFAULT_GAMMA, DEFAULT_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn zero_state() -> State {
        State::encode(0.6, 0.4, 0.0, 0)
    }

    /// A table with epsilon 0 always exploits.
    #[test]
    fn test_greedy_with_zero_epsilon() {
        let table = PolicyTable::new(0.1, 0.6, 0.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(table.select_action(zero_state(), &mut rng), Action::Accept);
        }
    }

    #[test]
    fn test_greedy_first_max_tie_break() {
        let mut table = PolicyTable::new(1.0, 0.0, 0.0);
        let state = zero_state();
        // Raise indices 0 and 2 to the same maximum; index 0 must win.
        table.update(state, Action::Accept, 0.5, state);
        table.update(state, Action::Reconsider, 0.5, state);
        assert_eq!(table.q_value(state, Action::Accept), 0.5);
        assert_eq!(table.q_value(state, Action::Reconsider), 0.5);
        assert_eq!(table.greedy(state), Action::Accept);
    }

    #[test]
    fn test_greedy_prefers_learned_action() {
        let mut table = PolicyTable::new(0.5, 0.0, 0.0);
        let state = zero_state();
        table.update(state, Action::Reject, 1.0, state);
        assert_eq!(table.greedy(state), Action::Reject);
    }

    #[test]
    fn test_update_matches_formula() {
        let mut table = PolicyTable::new(0.1, 0.6, 0.0);
        let state = zero_state();
        // All-zero row: 0 + 0.1 * (1 + 0.6*0 - 0) = 0.1
        let new_q = table.update(state, Action::Accept, 1.0, state);
        assert!((new_q - 0.1).abs() < 1e-12);

        // Second update sees max(Q[s']) = 0.1:
        // 0.1 + 0.1 * (1 + 0.6*0.1 - 0.1) = 0.196
        let new_q = table.update(state, Action::Accept, 1.0, state);
        assert!((new_q - 0.196).abs() < 1e-12);
    }

    /// Repeated stationary updates contract toward the fixed point.
    #[test]
    fn test_convergence_toward_fixed_point() {
        let mut table = PolicyTable::new(0.1, 0.0, 0.0);
        let state = zero_state();
        let target = 1.0;
        let mut prev_gap = (table.q_value(state, Action::Accept) - target).abs();
        for _ in 0..200 {
            table.update(state, Action::Accept, target, state);
            let gap = (table.q_value(state, Action::Accept) - target).abs();
            assert!(gap < prev_gap || gap < 1e-9);
            prev_gap = gap;
        }
        assert!(prev_gap < 1e-6);
    }

    /// With epsilon 1 every action eventually gets drawn.
    #[test]
    fn test_full_exploration_covers_actions() {
        let table = PolicyTable::new(0.1, 0.6, 1.0);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(table.select_action(zero_state(), &mut rng));
        }
        assert_eq!(seen.len(), ACTION_COUNT);
    }

    #[test]
    fn test_starts_all_zero() {
        let table = PolicyTable::default();
        assert_eq!(table.visited_cells(), 0);
        for (_, row) in table.rows() {
            assert_eq!(row, &[0.0; ACTION_COUNT]);
        }
    }

    /// A well-formed-JSON table with the wrong row count must be rejected
    /// at deserialization, never restored and indexed later.
    #[test]
    fn test_deserialization_rejects_wrong_row_count() {
        let short = r#"{"q":[[0.0,0.0,0.0]],"alpha":0.1,"gamma":0.6,"epsilon":0.1}"#;
        assert!(serde_json::from_str::<PolicyTable>(short).is_err());

        let empty = r#"{"q":[],"alpha":0.1,"gamma":0.6,"epsilon":0.1}"#;
        assert!(serde_json::from_str::<PolicyTable>(empty).is_err());

        let rows: Vec<[f64; ACTION_COUNT]> = vec![[0.0; ACTION_COUNT]; STATE_COUNT + 1];
        let long = serde_json::json!({"q": rows, "alpha": 0.1, "gamma": 0.6, "epsilon": 0.1});
        assert!(serde_json::from_value::<PolicyTable>(long).is_err());
    }

    #[test]
    fn test_restored_table_is_fully_indexable() {
        let table = PolicyTable::default();
        let json = serde_json::to_string(&table).unwrap();
        let restored: PolicyTable = serde_json::from_str(&json).unwrap();
        for idx in 0..STATE_COUNT {
            let state = State::from_index(idx).unwrap();
            assert_eq!(restored.q_value(state, Action::Accept), 0.0);
        }
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut table = PolicyTable::new(0.2, 0.9, 0.05);
        let state = zero_state();
        table.update(state, Action::Reconsider, 0.0, state);
        table.update(state, Action::Accept, 1.0, state);

        let json = serde_json::to_string(&table).unwrap();
        let restored: PolicyTable = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.alpha(), 0.2);
        assert_eq!(restored.gamma(), 0.9);
        assert_eq!(
            restored.q_value(state, Action::Accept),
            table.q_value(state, Action::Accept)
        );
    }
}
