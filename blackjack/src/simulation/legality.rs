//! Which actions the player may take on the hand being played.
//!
//! `number_of_hands` is how many hands the player holds right now: a second hand
//! only exists after a split, and at most one split is allowed.

use super::Hand;
use crate::Action;

pub fn can_hit(hand: &Hand) -> bool {
    hand.value() < 21
}

pub fn can_stand(_hand: &Hand) -> bool {
    true
}

pub fn can_split(hand: &Hand, number_of_hands: usize) -> bool {
    hand.is_doubles() && number_of_hands == 1
}

/// Only on the untouched two-card hand of an unsplit round.
pub fn can_double(hand: &Hand, number_of_hands: usize) -> bool {
    number_of_hands == 1 && hand.len() == 2
}

/// Legal actions in the order Hit, Stand, Double, Split. A blackjack can only stand.
pub fn legal_actions(hand: &Hand, number_of_hands: usize) -> Vec<Action> {
    if hand.is_blackjack() {
        return vec![Action::Stand];
    }

    let mut actions = Vec::with_capacity(4);
    if can_hit(hand) {
        actions.push(Action::Hit);
    }
    if can_stand(hand) {
        actions.push(Action::Stand);
    }
    if can_double(hand, number_of_hands) {
        actions.push(Action::Double);
    }
    if can_split(hand, number_of_hands) {
        actions.push(Action::Split);
    }
    actions
}

#[cfg(test)]
mod tests {
    use crate::simulation::{Card, Rank, Suit};

    use super::*;

    fn hand_of(cards: &[(Rank, Suit)]) -> Hand {
        Hand::from_cards(
            cards
                .iter()
                .map(|&(rank, suit)| Card::new(rank, suit))
                .collect(),
        )
    }

    #[test]
    fn fresh_hand_may_hit_stand_or_double() {
        let hand = hand_of(&[(Rank::Nine, Suit::Club), (Rank::Four, Suit::Club)]);
        assert_eq!(
            legal_actions(&hand, 1),
            vec![Action::Hit, Action::Stand, Action::Double]
        );
    }

    #[test]
    fn fresh_pair_may_also_split() {
        let hand = hand_of(&[(Rank::Nine, Suit::Club), (Rank::Nine, Suit::Heart)]);
        assert_eq!(
            legal_actions(&hand, 1),
            vec![Action::Hit, Action::Stand, Action::Double, Action::Split]
        );
    }

    #[test]
    fn blackjack_may_only_stand() {
        let hand = hand_of(&[(Rank::Ace, Suit::Heart), (Rank::King, Suit::Heart)]);
        assert_eq!(legal_actions(&hand, 1), vec![Action::Stand]);
        assert_eq!(legal_actions(&hand, 2), vec![Action::Stand]);
    }

    #[test]
    fn three_card_hand_may_hit_or_stand() {
        let hand = hand_of(&[
            (Rank::Ace, Suit::Heart),
            (Rank::King, Suit::Heart),
            (Rank::Three, Suit::Club),
        ]);
        assert_eq!(hand.value(), 14);
        assert_eq!(legal_actions(&hand, 1), vec![Action::Hit, Action::Stand]);
    }

    #[test]
    fn twenty_one_or_bust_may_only_stand() {
        let hand = hand_of(&[
            (Rank::Seven, Suit::Heart),
            (Rank::Seven, Suit::Club),
            (Rank::Seven, Suit::Spade),
        ]);
        assert_eq!(legal_actions(&hand, 1), vec![Action::Stand]);
        let hand = hand_of(&[
            (Rank::King, Suit::Heart),
            (Rank::Three, Suit::Club),
            (Rank::Nine, Suit::Club),
        ]);
        assert_eq!(legal_actions(&hand, 1), vec![Action::Stand]);
    }

    #[test]
    fn no_double_or_split_after_split() {
        let hand = hand_of(&[(Rank::Eight, Suit::Club), (Rank::Eight, Suit::Heart)]);
        assert!(!can_split(&hand, 2));
        assert!(!can_double(&hand, 2));
        assert_eq!(legal_actions(&hand, 2), vec![Action::Hit, Action::Stand]);
    }
}
