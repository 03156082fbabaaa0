pub mod error;
pub mod q_learning;
pub mod simulation;
mod statearray;
pub mod strategy;

use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum_macros::EnumIter;

pub use error::GameError;
pub use statearray::{QState, StateArray};

/// The dealer stands on any total at or above this value, soft or hard.
pub const DEALER_STAND_VALUE: u8 = 17;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Flat bet placed on every hand, and on the second hand after a split.
    pub base_bet: u32,
    pub payout_blackjack: f64,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            base_bet: 10,
            payout_blackjack: 1.5,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize_enum_str,
    Deserialize_enum_str,
)]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
}

impl Action {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Outcome of one player hand against the dealer.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, Serialize_enum_str, Deserialize_enum_str,
)]
pub enum WinState {
    Win,
    Blackjack,
    Push,
    Lose,
}

impl WinState {
    /// Net payout for a hand that carried `bet`.
    pub fn payout(self, bet: u32, rule: &Rule) -> f64 {
        let bet = bet as f64;
        match self {
            WinState::Win => bet,
            WinState::Blackjack => rule.payout_blackjack * bet,
            WinState::Push => 0.0,
            WinState::Lose => -bet,
        }
    }
}

/// Identifies which player strategy a session runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    User,
    Optimal,
    Expectimax,
    Random,
    QLearning,
}
