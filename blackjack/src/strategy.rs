mod expectimax;
mod policy_table;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

pub use self::{expectimax::ExpectimaxStrategy, policy_table::PolicyTable};
use crate::{error::Result, simulation::GameState, Action, GameError, DEALER_STAND_VALUE};

/// A player (or dealer) decision procedure over the game state.
///
/// The learning hooks default to no-ops; only a strategy that learns from play
/// needs to look at transitions and payouts.
pub trait Strategy {
    /// Returns an action that is legal in `state`.
    fn make_decision(&mut self, state: &GameState) -> Result<Action>;

    /// Called after the session applied `action` to `previous`, producing `next`.
    fn observe_transition(
        &mut self,
        _previous: &GameState,
        _action: Action,
        _next: &GameState,
    ) -> Result<()> {
        Ok(())
    }

    /// Called once per round with the payout of every player hand.
    fn observe_payouts(&mut self, _payouts: &[f64]) -> Result<()> {
        Ok(())
    }

    /// Rounds played while training are left out of session statistics.
    fn is_training(&self) -> bool {
        false
    }
}

/// Rows of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_enum_str, Deserialize_enum_str)]
#[serde(rename_all = "lowercase")]
pub enum HandClass {
    Hard,
    Soft,
    Double,
}

/// The house rule: stand at 17 or more, otherwise hit. No soft-17 exception.
#[derive(Debug, Clone, Copy, Default)]
pub struct DealerStrategy;

impl DealerStrategy {
    pub fn decide(&self, state: &GameState) -> Action {
        if state.dealer_hand().value() >= DEALER_STAND_VALUE {
            Action::Stand
        } else {
            Action::Hit
        }
    }
}

impl Strategy for DealerStrategy {
    fn make_decision(&mut self, state: &GameState) -> Result<Action> {
        Ok(self.decide(state))
    }
}

/// Plays by table lookup, falling back along each entry's action list until it
/// finds a legal action.
#[derive(Debug, Clone, Default)]
pub struct BasicStrategy {
    table: PolicyTable,
}

impl BasicStrategy {
    pub fn new(table: PolicyTable) -> BasicStrategy {
        BasicStrategy { table }
    }

    /// The row a hand is looked up under. A pair that can no longer be split is
    /// played as the hard or soft total it is.
    pub fn classify(state: &GameState, legal: &[Action]) -> Option<(HandClass, u8)> {
        let hand = state.current_hand()?;
        if hand.is_doubles() && legal.contains(&Action::Split) {
            return Some((HandClass::Double, hand.cards()[0].rank.pair_key()));
        }
        let class = if hand.is_hard() {
            HandClass::Hard
        } else {
            HandClass::Soft
        };
        Some((class, hand.value()))
    }
}

impl Strategy for BasicStrategy {
    fn make_decision(&mut self, state: &GameState) -> Result<Action> {
        let legal = state.legal_actions();
        let (class, player_value) =
            Self::classify(state, &legal).ok_or(GameError::NoLegalActions)?;
        let dealer_value = state.dealer_hand().value();

        let candidates = self.table.lookup(class, player_value, dealer_value)?;
        candidates
            .iter()
            .copied()
            .find(|action| legal.contains(action))
            .ok_or(GameError::PolicyExhausted {
                class,
                player_value,
                dealer_value,
            })
    }
}

/// Picks uniformly among the legal actions.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(rng: StdRng) -> RandomStrategy {
        RandomStrategy { rng }
    }

    pub fn with_seed(seed: u64) -> RandomStrategy {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Strategy for RandomStrategy {
    fn make_decision(&mut self, state: &GameState) -> Result<Action> {
        state
            .legal_actions()
            .choose(&mut self.rng)
            .copied()
            .ok_or(GameError::NoLegalActions)
    }
}

/// Asks an outside source, usually a person at a console, for every decision.
pub struct InteractiveStrategy<F>
where
    F: FnMut(&GameState, &[Action]) -> Action,
{
    get_action: F,
}

impl<F> InteractiveStrategy<F>
where
    F: FnMut(&GameState, &[Action]) -> Action,
{
    pub fn new(get_action: F) -> Self {
        InteractiveStrategy { get_action }
    }
}

impl<F> Strategy for InteractiveStrategy<F>
where
    F: FnMut(&GameState, &[Action]) -> Action,
{
    fn make_decision(&mut self, state: &GameState) -> Result<Action> {
        let legal = state.legal_actions();
        if legal.is_empty() {
            return Err(GameError::NoLegalActions);
        }
        let action = (self.get_action)(state, &legal);
        if !legal.contains(&action) {
            return Err(GameError::IllegalAction { action, legal });
        }
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Card, InfiniteDeck, Rank, Suit};
    use crate::Rule;

    fn dealt(firsts: &[Rank]) -> GameState {
        let deck = InfiniteDeck::with_seed(5).with_firsts(
            firsts
                .iter()
                .enumerate()
                .map(|(i, &rank)| Card::new(rank, if i % 2 == 0 { Suit::Club } else { Suit::Heart })),
        );
        GameState::new(&Rule::default(), 1000.0, deck)
            .deal_initial()
            .unwrap()
    }

    #[test]
    fn dealer_stands_on_seventeen() {
        let state = dealt(&[Rank::King, Rank::Queen, Rank::Seven, Rank::Ten]);
        let mut dealer = DealerStrategy;
        assert_eq!(dealer.make_decision(&state).unwrap(), Action::Hit);

        let state = state.apply_player_action(Action::Stand).unwrap();
        let state = state.apply_dealer_action(Action::Hit).unwrap();
        assert_eq!(state.dealer_hand().value(), 17);
        assert_eq!(dealer.make_decision(&state).unwrap(), Action::Stand);
    }

    #[test]
    fn dealer_hits_soft_sixteen() {
        let state = dealt(&[Rank::King, Rank::Queen, Rank::Ace, Rank::Five]);
        let state = state.apply_player_action(Action::Stand).unwrap();
        let state = state.apply_dealer_action(Action::Hit).unwrap();
        assert_eq!(state.dealer_hand().value(), 16);
        assert_eq!(DealerStrategy.decide(&state), Action::Hit);
    }

    #[test]
    fn basic_strategy_doubles_eleven() {
        let state = dealt(&[Rank::Six, Rank::Five, Rank::Six]);
        let mut strategy = BasicStrategy::default();
        assert_eq!(strategy.make_decision(&state).unwrap(), Action::Double);
    }

    #[test]
    fn basic_strategy_falls_back_when_double_is_illegal() {
        // 3 + 3 + 5 = hard 11 on three cards: the table says double, hit instead.
        let state = dealt(&[Rank::Three, Rank::Two, Rank::Six, Rank::Six]);
        let state = state.apply_player_action(Action::Hit).unwrap();
        assert_eq!(state.current_hand().unwrap().value(), 11);
        let mut strategy = BasicStrategy::default();
        assert_eq!(strategy.make_decision(&state).unwrap(), Action::Hit);
    }

    #[test]
    fn basic_strategy_splits_eights_but_not_tens() {
        let mut strategy = BasicStrategy::default();
        let state = dealt(&[Rank::Eight, Rank::Eight, Rank::Ten]);
        assert_eq!(strategy.make_decision(&state).unwrap(), Action::Split);

        let state = dealt(&[Rank::Ten, Rank::Ten, Rank::Six]);
        assert_eq!(
            BasicStrategy::classify(&state, &state.legal_actions()),
            Some((HandClass::Double, 10))
        );
        assert_eq!(strategy.make_decision(&state).unwrap(), Action::Stand);
    }

    #[test]
    fn pair_after_split_is_played_as_total() {
        let state = dealt(&[Rank::Eight, Rank::Eight, Rank::Six, Rank::Eight, Rank::Nine]);
        let state = state.apply_player_action(Action::Split).unwrap();
        assert!(state.current_hand().unwrap().is_doubles());
        assert_eq!(
            BasicStrategy::classify(&state, &state.legal_actions()),
            Some((HandClass::Hard, 16))
        );
        let mut strategy = BasicStrategy::default();
        assert_eq!(strategy.make_decision(&state).unwrap(), Action::Stand);
    }

    #[test]
    fn basic_strategy_stands_on_blackjack() {
        let state = dealt(&[Rank::Ace, Rank::King, Rank::Six]);
        let mut strategy = BasicStrategy::default();
        assert_eq!(strategy.make_decision(&state).unwrap(), Action::Stand);
    }

    #[test]
    fn missing_table_entry_is_reported() {
        let state = dealt(&[Rank::King, Rank::Seven, Rank::Six]);
        let mut strategy = BasicStrategy::new(PolicyTable::new());
        assert_eq!(
            strategy.make_decision(&state).unwrap_err(),
            GameError::PolicyMiss {
                class: HandClass::Hard,
                player_value: 17,
                dealer_value: 6,
            }
        );
    }

    #[test]
    fn random_strategy_only_picks_legal_actions() {
        let state = dealt(&[Rank::Nine, Rank::Nine, Rank::Six]);
        let legal = state.legal_actions();
        let mut strategy = RandomStrategy::with_seed(9);
        let mut picked = std::collections::HashSet::new();
        for _ in 0..200 {
            let action = strategy.make_decision(&state).unwrap();
            assert!(legal.contains(&action));
            picked.insert(action);
        }
        assert_eq!(picked.len(), legal.len());
    }

    #[test]
    fn interactive_strategy_rejects_illegal_choice() {
        let state = dealt(&[Rank::Nine, Rank::Four, Rank::Six]);
        let mut strategy = InteractiveStrategy::new(|_: &GameState, _: &[Action]| Action::Split);
        assert!(matches!(
            strategy.make_decision(&state),
            Err(GameError::IllegalAction {
                action: Action::Split,
                ..
            })
        ));

        let mut strategy =
            InteractiveStrategy::new(|_: &GameState, legal: &[Action]| legal[legal.len() - 1]);
        assert_eq!(strategy.make_decision(&state).unwrap(), Action::Double);
    }

    #[test]
    fn no_decision_on_dealer_turn() {
        let state = dealt(&[Rank::King, Rank::Queen, Rank::Six]);
        let state = state.apply_player_action(Action::Stand).unwrap();
        assert_eq!(
            RandomStrategy::with_seed(1).make_decision(&state).unwrap_err(),
            GameError::NoLegalActions
        );
    }
}
