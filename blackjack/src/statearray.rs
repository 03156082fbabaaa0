use std::collections::hash_map::{self, HashMap};
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::simulation::GameState;

/// The learner's reduced view of a decision point: the dealer's total, the total
/// of the hand being played and whether that hand is hard. Exact cards, bets and
/// the other split hand are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QState {
    pub dealer_value: u8,
    pub player_value: u8,
    pub hard: bool,
}

impl QState {
    pub fn new(dealer_value: u8, player_value: u8, hard: bool) -> QState {
        QState {
            dealer_value,
            player_value,
            hard,
        }
    }

    /// None when the player has no hand left to play.
    pub fn observe(state: &GameState) -> Option<QState> {
        let hand = state.current_hand()?;
        Some(QState {
            dealer_value: state.dealer_hand().value(),
            player_value: hand.value(),
            hard: hand.is_hard(),
        })
    }

    /// A state the player can only be in after busting against a live dealer.
    pub fn is_player_bust(&self) -> bool {
        self.player_value > 21 && self.dealer_value <= 21
    }
}

/// This struct provides a convenient way to use QState as the index of an
/// array. Indexing mutably inserts a default entry for an unseen state.
#[derive(Debug, Default, Clone)]
pub struct StateArray<T: Default> {
    data: HashMap<QState, T>,
}

impl<T: Default> StateArray<T> {
    pub fn new() -> StateArray<T> {
        StateArray {
            data: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn contains_state(&self, index: &QState) -> bool {
        self.data.contains_key(index)
    }

    pub fn get(&self, index: &QState) -> Option<&T> {
        self.data.get(index)
    }

    pub fn insert(&mut self, index: QState, value: T) {
        self.data.insert(index, value);
    }

    pub fn iter(&self) -> hash_map::Iter<'_, QState, T> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Default> Index<&QState> for StateArray<T> {
    type Output = T;
    fn index(&self, index: &QState) -> &Self::Output {
        &self.data[index]
    }
}

impl<T: Default> IndexMut<&QState> for StateArray<T> {
    fn index_mut(&mut self, index: &QState) -> &mut Self::Output {
        self.data.entry(*index).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Card, InfiniteDeck, Rank, Suit};
    use crate::Rule;

    #[test]
    fn states_equal_only_when_all_fields_match() {
        assert_eq!(QState::new(10, 16, true), QState::new(10, 16, true));
        assert_ne!(QState::new(10, 16, true), QState::new(10, 16, false));
        assert_ne!(QState::new(9, 16, true), QState::new(10, 16, true));
    }

    #[test]
    fn observe_reads_dealer_and_current_hand() {
        let deck = InfiniteDeck::with_seed(3).with_firsts([
            Card::new(Rank::Ace, Suit::Club),
            Card::new(Rank::Five, Suit::Club),
            Card::new(Rank::Ten, Suit::Heart),
        ]);
        let state = GameState::new(&Rule::default(), 100.0, deck)
            .deal_initial()
            .unwrap();
        assert_eq!(QState::observe(&state), Some(QState::new(10, 16, false)));
    }

    #[test]
    fn bust_states_are_flagged() {
        assert!(QState::new(10, 24, true).is_player_bust());
        assert!(!QState::new(23, 24, true).is_player_bust());
        assert!(!QState::new(10, 21, true).is_player_bust());
    }

    #[test]
    fn test_state_array() {
        let mut sa: StateArray<i32> = StateArray::new();
        let s1 = QState::new(7, 12, true);
        sa[&s1] = 666;
        let s2 = QState::new(7, 12, false);
        sa[&s2] = 111;
        assert_eq!(sa[&QState::new(7, 12, true)], 666);
        assert_eq!(sa[&s2], 111);
        assert_eq!(sa.len(), 2);
        sa[&QState::new(8, 12, true)] += 1;
        assert_eq!(sa[&QState::new(8, 12, true)], 1);
        assert!(sa.contains_state(&s1));
        sa.clear();
        assert!(sa.is_empty());
        assert!(sa.get(&s1).is_none());
    }
}
