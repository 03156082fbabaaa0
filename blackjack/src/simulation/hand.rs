use super::{Card, Rank, RankValue};

/// One group of cards. Everything about its value is derived from `cards` on
/// demand, so adding a card can never leave a stale total behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hand {
    cards: Vec<Card>,
}

/// Both valuations of a hand. `soft` counts the first Ace as 11 and any other
/// Ace as 1; `hard` counts every Ace as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Valuation {
    hard: u8,
    soft: u8,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(3),
        }
    }

    pub fn from_cards(cards: Vec<Card>) -> Hand {
        Hand { cards }
    }

    pub fn receive_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn valuation(&self) -> Valuation {
        let mut seen_ace = false;
        let mut hard: u8 = 0;
        let mut soft: u8 = 0;
        for card in &self.cards {
            match card.rank.value() {
                RankValue::Fixed(value) => {
                    hard += value;
                    soft += value;
                }
                RankValue::Either { high, low } => {
                    hard += low;
                    soft += if seen_ace { low } else { high };
                    seen_ace = true;
                }
            }
        }
        Valuation { hard, soft }
    }

    /// Soft only while the best valuation uses an Ace as 11.
    pub fn is_soft(&self) -> bool {
        let valuation = self.valuation();
        valuation.soft > valuation.hard && valuation.soft <= 21
    }

    pub fn is_hard(&self) -> bool {
        !self.is_soft()
    }

    pub fn value(&self) -> u8 {
        let valuation = self.valuation();
        if valuation.soft > valuation.hard && valuation.soft <= 21 {
            valuation.soft
        } else {
            valuation.hard
        }
    }

    pub fn is_bust(&self) -> bool {
        self.value() > 21
    }

    /// Exactly two cards of the same rank.
    pub fn is_doubles(&self) -> bool {
        self.cards.len() == 2 && self.cards[0] == self.cards[1]
    }

    /// Exactly two cards: an Ace and a ten-valued rank.
    pub fn is_blackjack(&self) -> bool {
        if self.cards.len() != 2 {
            return false;
        }
        let (first, second) = (self.cards[0].rank, self.cards[1].rank);
        (first == Rank::Ace && second.is_ten_valued())
            || (second == Rank::Ace && first.is_ten_valued())
    }

    /// Splits a pair into two single-card hands, first card first.
    pub(crate) fn split_pair(&self) -> Option<(Hand, Hand)> {
        if !self.is_doubles() {
            return None;
        }
        let mut first = Hand::new();
        first.receive_card(self.cards[0]);
        let mut second = Hand::new();
        second.receive_card(self.cards[1]);
        Some((first, second))
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", card)?;
        }
        write!(
            f,
            " ({} {})",
            if self.is_hard() { "hard" } else { "soft" },
            self.value()
        )
    }
}
