use serde::{Deserialize, Serialize};
use tracing::trace;

use super::QLearningParams;
use crate::{error::Result, Action, GameError, QState, StateArray};

/// Value pinned to states the player can only reach by busting. Such states are
/// never stored in the table.
pub const BUST_VALUE: f64 = -100.0;

/// Estimated value of each action in one state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionValues {
    pub hit: f64,
    pub stand: f64,
    pub double: f64,
    /// Only tracked for even player totals, the only totals a pair can have.
    pub split: Option<f64>,
}

impl ActionValues {
    /// All tracked actions start at 0.
    pub fn initial(state: &QState) -> ActionValues {
        ActionValues {
            split: (state.player_value % 2 == 0).then_some(0.0),
            ..Default::default()
        }
    }

    pub fn get(&self, action: Action) -> Option<f64> {
        match action {
            Action::Hit => Some(self.hit),
            Action::Stand => Some(self.stand),
            Action::Double => Some(self.double),
            Action::Split => self.split,
        }
    }

    fn get_mut(&mut self, action: Action) -> Option<&mut f64> {
        match action {
            Action::Hit => Some(&mut self.hit),
            Action::Stand => Some(&mut self.stand),
            Action::Double => Some(&mut self.double),
            Action::Split => self.split.as_mut(),
        }
    }

    /// Tracked actions from best to worst.
    pub fn ranked(&self) -> Vec<(Action, f64)> {
        let mut ranked: Vec<(Action, f64)> = [Action::Stand, Action::Hit, Action::Split, Action::Double]
            .into_iter()
            .filter_map(|action| self.get(action).map(|value| (action, value)))
            .collect();
        ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        ranked
    }
}

/// Q-values and visit counts, both keyed by the reduced state.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: StateArray<ActionValues>,
    visits: StateArray<[u32; 4]>,
    params: QLearningParams,
}

impl QTable {
    pub fn new(params: QLearningParams) -> QTable {
        QTable {
            values: StateArray::new(),
            visits: StateArray::new(),
            params,
        }
    }

    pub fn params(&self) -> &QLearningParams {
        &self.params
    }

    /// Q(s, a). A first visit to a state enters it with every tracked action at 0.
    pub fn value(&mut self, state: &QState, action: Action) -> Result<f64> {
        if state.is_player_bust() {
            return Ok(BUST_VALUE);
        }
        if !self.values.contains_state(state) {
            self.values.insert(*state, ActionValues::initial(state));
        }
        self.values[state]
            .get(action)
            .ok_or(GameError::UntrackedAction { action })
    }

    /// Overwrites Q(s, a). Writes to bust states are dropped.
    pub fn set_value(&mut self, state: &QState, action: Action, value: f64) -> Result<()> {
        if state.is_player_bust() {
            return Ok(());
        }
        if !self.values.contains_state(state) {
            self.values.insert(*state, ActionValues::initial(state));
        }
        let slot = self.values[state]
            .get_mut(action)
            .ok_or(GameError::UntrackedAction { action })?;
        *slot = value;
        Ok(())
    }

    /// Learning rate for (s, a). Every call counts as one more visit.
    pub fn alpha(&mut self, state: &QState, action: Action) -> f64 {
        let visits = &mut self.visits[state][action.index()];
        *visits += 1;
        1.0 / (*visits as f64).powf(self.params.omega)
    }

    pub fn visits(&self, state: &QState, action: Action) -> u32 {
        self.visits
            .get(state)
            .map_or(0, |counts| counts[action.index()])
    }

    /// max Q(s, a) over `legal`, or 0 when there is nothing left to choose.
    pub fn max_value(&mut self, state: Option<&QState>, legal: &[Action]) -> Result<f64> {
        let state = match state {
            Some(state) if !legal.is_empty() => state,
            _ => return Ok(0.0),
        };
        let mut best = f64::NEG_INFINITY;
        for &action in legal {
            best = best.max(self.value(state, action)?);
        }
        Ok(best)
    }

    /// Every action in `legal` that shares the highest value.
    pub fn greedy_actions(&mut self, state: &QState, legal: &[Action]) -> Result<Vec<Action>> {
        let mut best = f64::NEG_INFINITY;
        let mut greedy = Vec::new();
        for &action in legal {
            let value = self.value(state, action)?;
            if value > best {
                best = value;
                greedy.clear();
                greedy.push(action);
            } else if value == best {
                greedy.push(action);
            }
        }
        Ok(greedy)
    }

    /// Applies one TD(0) step for `(state, action) -> next` with `reward` and
    /// returns the new Q(state, action).
    pub fn update(
        &mut self,
        state: &QState,
        action: Action,
        reward: f64,
        next: Option<&QState>,
        next_legal: &[Action],
    ) -> Result<f64> {
        let old = self.value(state, action)?;
        let alpha = self.alpha(state, action);
        let next_value = self.max_value(next, next_legal)?;
        let new = old + alpha * (reward + self.params.discount * next_value - old);
        self.set_value(state, action, new)?;
        trace!(?state, ?action, reward, old, new, alpha, "q update");
        Ok(new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QState, &ActionValues)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
