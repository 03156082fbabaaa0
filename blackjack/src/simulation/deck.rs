use std::collections::VecDeque;

use super::{Card, Rank, Suit};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strum::IntoEnumIterator;

/// A single 52-card deck dealt with replacement: every draw is an independent,
/// uniform pick, so there is no depletion and nothing to reshuffle.
///
/// Cloning a deck clones its random source. A cloned game state therefore draws
/// the same cards as the original would have, without advancing it.
#[derive(Debug, Clone)]
pub struct InfiniteDeck {
    cards: Vec<Card>,
    firsts: VecDeque<Card>,
    rng: StdRng,
}

impl InfiniteDeck {
    pub fn new(rng: StdRng) -> InfiniteDeck {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::iter() {
            for rank in Rank::iter() {
                cards.push(Card { rank, suit });
            }
        }
        InfiniteDeck {
            cards,
            firsts: VecDeque::new(),
            rng,
        }
    }

    pub fn with_seed(seed: u64) -> InfiniteDeck {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Makes sure the given cards are dealt next, in order, before random
    /// sampling resumes.
    pub fn with_firsts(mut self, firsts: impl IntoIterator<Item = Card>) -> InfiniteDeck {
        self.firsts.extend(firsts);
        self
    }

    pub fn deal_card(&mut self) -> Card {
        if let Some(card) = self.firsts.pop_front() {
            return card;
        }
        self.cards[self.rng.gen_range(0..self.cards.len())]
    }

    /// Mean blackjack value of one draw over the full rank distribution, counting
    /// the Ace as 1.
    pub fn average_card_value() -> f64 {
        let sum: u32 = Rank::iter().map(|rank| rank.value().low() as u32).sum();
        sum as f64 / Rank::iter().count() as f64
    }

    #[cfg(test)]
    pub fn number_of_primed_cards(&self) -> usize {
        self.firsts.len()
    }
}
