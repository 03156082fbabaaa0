use std::collections::HashMap;

use super::HandClass;
use crate::{error::Result, Action, GameError};

const H: &[Action] = &[Action::Hit];
const S: &[Action] = &[Action::Stand];
const P: &[Action] = &[Action::Split];
const DH: &[Action] = &[Action::Double, Action::Hit];
const DS: &[Action] = &[Action::Double, Action::Stand];

/// Dealer values covered by every row, left to right. The Ace comes last as 11.
const DEALER_VALUES: std::ops::RangeInclusive<u8> = 2..=11;

type Row = [&'static [Action]; 10];

/// Maps (hand class, player value, dealer value) to an ordered list of candidate
/// actions. For a doubles hand the player value is the value of one of the paired
/// cards, with an Ace as 11.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    entries: HashMap<(HandClass, u8, u8), Vec<Action>>,
}

impl PolicyTable {
    /// An empty table. Every lookup misses until entries are inserted.
    pub fn new() -> PolicyTable {
        PolicyTable {
            entries: HashMap::new(),
        }
    }

    /// The built-in basic strategy: hard 4 to 21, soft 12 to 21 and pairs of 2
    /// to Ace against every dealer value from 2 to 11.
    pub fn basic() -> PolicyTable {
        #[rustfmt::skip]
        let hard_charts: [Row; 18] = [
            [H, H, H, H, H, H, H, H, H, H], // 4
            [H, H, H, H, H, H, H, H, H, H],
            [H, H, H, H, H, H, H, H, H, H],
            [H, H, H, H, H, H, H, H, H, H],
            [H, H, H, H, H, H, H, H, H, H],
            [H, DH, DH, DH, DH, H, H, H, H, H],
            [DH, DH, DH, DH, DH, DH, DH, DH, H, H],
            [DH, DH, DH, DH, DH, DH, DH, DH, DH, DH],
            [H, H, S, S, S, H, H, H, H, H],
            [S, S, S, S, S, H, H, H, H, H],
            [S, S, S, S, S, H, H, H, H, H],
            [S, S, S, S, S, H, H, H, H, H],
            [S, S, S, S, S, H, H, H, H, H], // 16
            [S, S, S, S, S, S, S, S, S, S],
            [S, S, S, S, S, S, S, S, S, S],
            [S, S, S, S, S, S, S, S, S, S],
            [S, S, S, S, S, S, S, S, S, S],
            [S, S, S, S, S, S, S, S, S, S], // 21
        ];
        #[rustfmt::skip]
        let soft_charts: [Row; 10] = [
            [H, H, H, H, H, H, H, H, H, H], // Ace + Ace
            [H, H, H, DH, DH, H, H, H, H, H], // Ace + 2
            [H, H, H, DH, DH, H, H, H, H, H],
            [H, H, DH, DH, DH, H, H, H, H, H],
            [H, H, DH, DH, DH, H, H, H, H, H],
            [H, DH, DH, DH, DH, H, H, H, H, H],
            [DS, DS, DS, DS, DS, S, S, H, H, H],
            [S, S, S, S, DS, S, S, S, S, S],
            [S, S, S, S, S, S, S, S, S, S],
            [S, S, S, S, S, S, S, S, S, S], // Ace + 10
        ];
        #[rustfmt::skip]
        let pair_charts: [Row; 10] = [
            [P, P, P, P, P, P, H, H, H, H], // Double 2
            [P, P, P, P, P, P, H, H, H, H],
            [H, H, H, P, P, H, H, H, H, H],
            [DH, DH, DH, DH, DH, DH, DH, DH, H, H],
            [P, P, P, P, P, H, H, H, H, H],
            [P, P, P, P, P, P, H, H, H, H],
            [P, P, P, P, P, P, P, P, P, P],
            [P, P, P, P, P, S, P, P, S, S],
            [S, S, S, S, S, S, S, S, S, S], // Double 10
            [P, P, P, P, P, P, P, P, P, P], // Double Ace
        ];

        let mut table = PolicyTable::new();
        table.fill(HandClass::Hard, 4, &hard_charts);
        table.fill(HandClass::Soft, 12, &soft_charts);
        table.fill(HandClass::Double, 2, &pair_charts);
        table
    }

    fn fill(&mut self, class: HandClass, first_player_value: u8, rows: &[Row]) {
        for (player_value, row) in (first_player_value..).zip(rows) {
            for (dealer_value, actions) in DEALER_VALUES.zip(row) {
                self.insert(class, player_value, dealer_value, actions.to_vec());
            }
        }
    }

    /// Replaces whatever the table held for this key.
    pub fn insert(
        &mut self,
        class: HandClass,
        player_value: u8,
        dealer_value: u8,
        actions: Vec<Action>,
    ) {
        self.entries
            .insert((class, player_value, dealer_value), actions);
    }

    pub fn lookup(&self, class: HandClass, player_value: u8, dealer_value: u8) -> Result<&[Action]> {
        self.entries
            .get(&(class, player_value, dealer_value))
            .map(Vec::as_slice)
            .ok_or(GameError::PolicyMiss {
                class,
                player_value,
                dealer_value,
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::basic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_table_is_dense() {
        let table = PolicyTable::basic();
        assert_eq!(table.len(), (18 + 10 + 10) * 10);
        for dealer_value in 2..=11 {
            for player_value in 4..=21 {
                assert!(table.lookup(HandClass::Hard, player_value, dealer_value).is_ok());
            }
            for player_value in 12..=21 {
                assert!(table.lookup(HandClass::Soft, player_value, dealer_value).is_ok());
            }
            for pair_value in 2..=11 {
                assert!(table.lookup(HandClass::Double, pair_value, dealer_value).is_ok());
            }
        }
    }

    #[test]
    fn dealer_ace_is_the_last_column() {
        let table = PolicyTable::basic();
        assert_eq!(table.lookup(HandClass::Hard, 10, 10).unwrap(), DH);
        assert_eq!(table.lookup(HandClass::Hard, 10, 11).unwrap(), H);
        assert_eq!(table.lookup(HandClass::Double, 9, 11).unwrap(), S);
        assert_eq!(table.lookup(HandClass::Double, 11, 11).unwrap(), P);
    }

    #[test]
    fn soft_eighteen_doubles_or_stands() {
        let table = PolicyTable::basic();
        assert_eq!(
            table.lookup(HandClass::Soft, 18, 4).unwrap(),
            &[Action::Double, Action::Stand]
        );
        assert_eq!(table.lookup(HandClass::Soft, 18, 9).unwrap(), H);
    }

    #[test]
    fn insert_overrides_and_misses_are_errors() {
        let mut table = PolicyTable::new();
        assert!(table.is_empty());
        assert_eq!(
            table.lookup(HandClass::Soft, 13, 5).unwrap_err(),
            GameError::PolicyMiss {
                class: HandClass::Soft,
                player_value: 13,
                dealer_value: 5,
            }
        );
        table.insert(HandClass::Soft, 13, 5, vec![Action::Hit]);
        table.insert(HandClass::Soft, 13, 5, vec![Action::Double, Action::Hit]);
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lookup(HandClass::Soft, 13, 5).unwrap(),
            &[Action::Double, Action::Hit]
        );
    }
}
