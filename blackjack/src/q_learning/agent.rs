use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::{QLearningParams, QTable};
use crate::{
    error::Result, simulation::GameState, strategy::Strategy, Action, GameError, QState,
};

/// The last action taken on a hand, waiting for that hand's payout.
#[derive(Debug, Clone)]
struct PendingUpdate {
    state: QState,
    action: Action,
    next: Option<QState>,
    next_legal: Vec<Action>,
}

/// An epsilon-greedy player that learns its Q-table from the rounds it plays.
///
/// One episode is one round. The first `training_episodes` rounds explore, and
/// the session leaves them out of its statistics; every later round is played
/// greedily.
#[derive(Debug, Clone)]
pub struct QLearningStrategy {
    table: QTable,
    training_episodes: u64,
    episode: u64,
    rng: StdRng,
    pending: Vec<PendingUpdate>,
}

impl QLearningStrategy {
    pub fn new(params: QLearningParams, training_episodes: u64, rng: StdRng) -> QLearningStrategy {
        QLearningStrategy {
            table: QTable::new(params),
            training_episodes,
            episode: 0,
            rng,
            pending: Vec::new(),
        }
    }

    pub fn with_seed(params: QLearningParams, training_episodes: u64, seed: u64) -> QLearningStrategy {
        Self::new(params, training_episodes, StdRng::seed_from_u64(seed))
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn episode(&self) -> u64 {
        self.episode
    }

    /// 0.9 for the first 90% of training, 0.5 for the rest of it, then 0.
    pub fn epsilon(&self) -> f64 {
        if self.training_episodes == 0 {
            return 0.0;
        }
        let fraction_played = self.episode as f64 / self.training_episodes as f64;
        if fraction_played < 0.9 {
            0.9
        } else if fraction_played < 1.0 {
            0.5
        } else {
            0.0
        }
    }

    fn observe(state: &GameState) -> Result<QState> {
        QState::observe(state).ok_or(GameError::NoActiveHand {
            index: state.hand_index(),
            hands: state.number_of_hands(),
        })
    }
}

impl Strategy for QLearningStrategy {
    fn make_decision(&mut self, state: &GameState) -> Result<Action> {
        let legal = state.legal_actions();
        if legal.is_empty() {
            return Err(GameError::NoLegalActions);
        }
        let qstate = Self::observe(state)?;

        let candidates = if self.rng.gen::<f64>() < self.epsilon() {
            legal
        } else {
            self.table.greedy_actions(&qstate, &legal)?
        };
        candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or(GameError::NoLegalActions)
    }

    /// Play that stays on the same hand is rewarded 0 at once. The action that
    /// leaves a hand waits for the round's payouts.
    fn observe_transition(
        &mut self,
        previous: &GameState,
        action: Action,
        next: &GameState,
    ) -> Result<()> {
        let state = Self::observe(previous)?;
        let next_state = QState::observe(next);
        let next_legal = next.legal_actions();

        if next.is_player_turn() && next.hand_index() == previous.hand_index() {
            self.table
                .update(&state, action, 0.0, next_state.as_ref(), &next_legal)?;
        } else {
            trace!(?state, ?action, "deferring update until payout");
            self.pending.push(PendingUpdate {
                state,
                action,
                next: next_state,
                next_legal,
            });
        }
        Ok(())
    }

    fn observe_payouts(&mut self, payouts: &[f64]) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        // A dealt blackjack ends the round before any action; nothing to credit.
        if pending.len() == payouts.len() {
            for (update, &reward) in pending.iter().zip(payouts) {
                self.table.update(
                    &update.state,
                    update.action,
                    reward,
                    update.next.as_ref(),
                    &update.next_legal,
                )?;
            }
        } else {
            debug!(
                pending = pending.len(),
                payouts = payouts.len(),
                "skipping deferred updates"
            );
        }
        self.episode += 1;
        Ok(())
    }

    fn is_training(&self) -> bool {
        self.episode < self.training_episodes
    }
}
