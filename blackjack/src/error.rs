//! Contract violations raised by the game engine and its strategies.

use thiserror::Error;

use crate::{simulation::game_state::Turn, strategy::HandClass, Action};

/// Every variant is a caller or programming error, never a game outcome.
/// Transitions that hit one abort and leave the original state untouched.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameError {
    #[error("{operation} is only allowed on the {expected:?} turn, but it is the {actual:?} turn")]
    WrongTurn {
        operation: &'static str,
        expected: Turn,
        actual: Turn,
    },

    #[error("{action} is not legal for the current hand (legal: {legal:?})")]
    IllegalAction { action: Action, legal: Vec<Action> },

    #[error("dealer cannot {action}")]
    IllegalDealerAction { action: Action },

    #[error("cannot split a hand that is not a pair")]
    SplitNonPair,

    #[error("initial deal requires empty hands")]
    HandsAlreadyDealt,

    #[error("no active player hand at index {index} of {hands}")]
    NoActiveHand { index: usize, hands: usize },

    #[error("cannot settle a hand that is not finished")]
    NotTerminal,

    #[error("policy table has no entry for {class:?} {player_value} against dealer {dealer_value}")]
    PolicyMiss {
        class: HandClass,
        player_value: u8,
        dealer_value: u8,
    },

    #[error("policy table offers no legal action for {class:?} {player_value} against dealer {dealer_value}")]
    PolicyExhausted {
        class: HandClass,
        player_value: u8,
        dealer_value: u8,
    },

    #[error("Q-table does not track {action} for this state")]
    UntrackedAction { action: Action },

    #[error("no legal actions available")]
    NoLegalActions,
}

pub type Result<T> = std::result::Result<T, GameError>;
