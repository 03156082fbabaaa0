pub mod deck;
pub mod game_state;
pub mod hand;
pub mod legality;
pub mod session;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

pub use self::{
    deck::InfiniteDeck,
    game_state::{GameState, Settlement, Turn},
    hand::Hand,
    session::{OutcomeCounts, Session, SessionEventHandler, SessionReport},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Suit {
    Diamond = 0,
    Club,
    Heart,
    Spade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

/// What a rank counts for in a hand. Only the Ace has two candidates; which one
/// applies is decided by the hand valuation, not by the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankValue {
    Fixed(u8),
    Either { high: u8, low: u8 },
}

impl RankValue {
    /// The value when every Ace counts as 1.
    pub fn low(self) -> u8 {
        match self {
            RankValue::Fixed(value) => value,
            RankValue::Either { low, .. } => low,
        }
    }
}

impl Rank {
    pub fn value(self) -> RankValue {
        match self {
            Rank::Ace => RankValue::Either { high: 11, low: 1 },
            Rank::Jack | Rank::Queen | Rank::King => RankValue::Fixed(10),
            rank => RankValue::Fixed(rank as u8),
        }
    }

    pub fn is_ten_valued(self) -> bool {
        self.value() == RankValue::Fixed(10)
    }

    /// Value used to key pairs in the rule table. Aces are keyed as 11.
    pub fn pair_key(self) -> u8 {
        match self.value() {
            RankValue::Fixed(value) => value,
            RankValue::Either { high, .. } => high,
        }
    }
}

/// Represents a card in the real world with a rank and a suit. Two cards are equal
/// when their ranks match; the suit is only for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

impl Eq for Card {}

impl std::hash::Hash for Card {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.rank.hash(state);
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suit = match self.suit {
            Suit::Diamond => '\u{2666}',
            Suit::Club => '\u{2663}',
            Suit::Heart => '\u{2665}',
            Suit::Spade => '\u{2660}',
        };
        let rank = match self.rank {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        };
        write!(f, "{}{}", rank, suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_compare_by_rank_only() {
        assert_eq!(
            Card::new(Rank::Nine, Suit::Club),
            Card::new(Rank::Nine, Suit::Heart)
        );
        assert_ne!(
            Card::new(Rank::King, Suit::Club),
            Card::new(Rank::Queen, Suit::Club)
        );
    }

    #[test]
    fn rank_values() {
        assert_eq!(Rank::Ace.value(), RankValue::Either { high: 11, low: 1 });
        assert_eq!(Rank::Seven.value(), RankValue::Fixed(7));
        assert_eq!(Rank::Queen.value(), RankValue::Fixed(10));
        assert!(Rank::Ten.is_ten_valued());
        assert!(!Rank::Ace.is_ten_valued());
        assert_eq!(Rank::Ace.pair_key(), 11);
        assert_eq!(Rank::King.pair_key(), 10);
    }

    #[test]
    fn display_card() {
        assert_eq!(Card::new(Rank::Ace, Suit::Diamond).to_string(), "A\u{2666}");
        assert_eq!(Card::new(Rank::Ten, Suit::Spade).to_string(), "10\u{2660}");
    }
}
