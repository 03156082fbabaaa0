//! Tabular Q-learning over the reduced blackjack state.
//!
//! The table keys on [`QState`](crate::QState): dealer total, player total and
//! whether the player's hand is hard. Learning rates decay per (state, action)
//! pair as `1 / n^omega`, exploration follows a fixed schedule over the training
//! episodes, and each update is the usual TD(0) step
//! `Q(s,a) += alpha * (r + gamma * max Q(s',.) - Q(s,a))`.

mod agent;
mod q_table;

use serde::{Deserialize, Serialize};

pub use self::{
    agent::QLearningStrategy,
    q_table::{ActionValues, QTable, BUST_VALUE},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningParams {
    /// Discount applied to the successor state's value.
    pub discount: f64,
    /// Exponent of the hyperharmonic learning rate. Below 1 decays slower than 1/n.
    pub omega: f64,
}

impl Default for QLearningParams {
    fn default() -> Self {
        QLearningParams {
            discount: 0.3,
            omega: 0.97,
        }
    }
}
