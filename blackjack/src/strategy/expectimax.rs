use tracing::trace;

use super::Strategy;
use crate::{
    error::Result, simulation::GameState, simulation::InfiniteDeck, Action, GameError,
    DEALER_STAND_VALUE,
};

/// A one-ply expectation search that replaces every future card with the mean
/// card value. The player's first choice maximizes; every later choice on the
/// same hand is treated as an even mix of hitting and standing.
#[derive(Debug, Clone, Copy)]
pub struct ExpectimaxStrategy {
    average_card_value: f64,
}

impl ExpectimaxStrategy {
    pub fn new(average_card_value: f64) -> ExpectimaxStrategy {
        ExpectimaxStrategy { average_card_value }
    }

    /// Where the dealer is expected to finish, drawing average cards from its
    /// current total until reaching the standing total.
    pub fn dealer_estimate(&self, dealer_value: u8) -> f64 {
        let mut estimate = dealer_value as f64;
        while estimate < DEALER_STAND_VALUE as f64 {
            estimate += self.average_card_value;
        }
        estimate
    }

    /// Expected payout of taking `action` on a hand worth `player_value`.
    pub fn action_value(&self, action: Action, player_value: f64, dealer: f64, bet: f64) -> f64 {
        match action {
            Action::Hit => self.chance_value(player_value + self.average_card_value, dealer, bet),
            Action::Stand => payoff(player_value, dealer, bet),
            Action::Double => payoff(player_value + self.average_card_value, dealer, 2.0 * bet),
            // Two hands, each starting from one of the paired cards.
            Action::Split => 2.0 * self.chance_value(player_value / 2.0, dealer, bet),
        }
    }

    fn chance_value(&self, player_value: f64, dealer: f64, bet: f64) -> f64 {
        if player_value > 21.0 {
            return -bet;
        }
        let hit = self.chance_value(player_value + self.average_card_value, dealer, bet);
        let stand = payoff(player_value, dealer, bet);
        (hit + stand) / 2.0
    }
}

impl Default for ExpectimaxStrategy {
    fn default() -> Self {
        Self::new(InfiniteDeck::average_card_value())
    }
}

fn payoff(player_value: f64, dealer: f64, bet: f64) -> f64 {
    if player_value > 21.0 {
        -bet
    } else if dealer > 21.0 || player_value > dealer {
        bet
    } else if dealer > player_value {
        -bet
    } else {
        0.0
    }
}

impl Strategy for ExpectimaxStrategy {
    fn make_decision(&mut self, state: &GameState) -> Result<Action> {
        let hand = state.current_hand().ok_or(GameError::NoLegalActions)?;
        let player_value = hand.value() as f64;
        let dealer = self.dealer_estimate(state.dealer_hand().value());
        let bet = state.bets()[state.hand_index()] as f64;

        let mut best: Option<(Action, f64)> = None;
        for action in state.legal_actions() {
            let value = self.action_value(action, player_value, dealer, bet);
            trace!(?action, value, "expectimax");
            // Later actions win ties.
            if best.map_or(true, |(_, best_value)| value >= best_value) {
                best = Some((action, value));
            }
        }
        best.map(|(action, _)| action).ok_or(GameError::NoLegalActions)
    }
}
