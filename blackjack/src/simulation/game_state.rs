use std::cmp::Ordering;

use blackjack_macros::allowed_turn;
use tracing::{debug, trace};

use super::{legality, Hand, InfiniteDeck};
use crate::{error::Result, Action, GameError, Rule, WinState, DEALER_STAND_VALUE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Player,
    Dealer,
}

/// A snapshot of one round. Every transition takes `&self` and returns a new
/// state, so a state that is still referenced elsewhere (by a search, or by the
/// learner's trajectory) never changes underneath its holder.
///
/// The turn only ever moves from `Player` to `Dealer` within a round. While it is
/// the player's turn, `hand_index` points at a hand in `player_hands`.
#[derive(Debug, Clone)]
pub struct GameState {
    rule: Rule,
    dealer_hand: Hand,
    /// More than 1 hand only after a split.
    player_hands: Vec<Hand>,
    /// Index-aligned with `player_hands`.
    bets: Vec<u32>,
    hand_index: usize,
    turn: Turn,
    bankroll: f64,
    deck: InfiniteDeck,
}

/// The result of settling a finished round.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// The settled state. Its dealer hand may hold one more card than before
    /// settling, when a player blackjack had to be checked against the dealer.
    pub state: GameState,
    pub outcomes: Vec<WinState>,
    pub payouts: Vec<f64>,
}

impl Settlement {
    pub fn total_payout(&self) -> f64 {
        self.payouts.iter().sum()
    }

    pub fn total_bet(&self) -> u32 {
        self.state.bets.iter().sum()
    }
}

impl GameState {
    pub fn new(rule: &Rule, bankroll: f64, deck: InfiniteDeck) -> GameState {
        GameState {
            rule: *rule,
            dealer_hand: Hand::new(),
            player_hands: vec![Hand::new()],
            bets: vec![rule.base_bet],
            hand_index: 0,
            turn: Turn::Player,
            bankroll,
            deck,
        }
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    pub fn player_hands(&self) -> &[Hand] {
        &self.player_hands
    }

    pub fn number_of_hands(&self) -> usize {
        self.player_hands.len()
    }

    pub fn bets(&self) -> &[u32] {
        &self.bets
    }

    pub fn hand_index(&self) -> usize {
        self.hand_index
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn is_player_turn(&self) -> bool {
        self.turn == Turn::Player
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    /// The hand the player is deciding on, if any.
    pub fn current_hand(&self) -> Option<&Hand> {
        self.player_hands.get(self.hand_index)
    }

    /// Empty once the player has nothing left to decide.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.turn != Turn::Player {
            return Vec::new();
        }
        match self.current_hand() {
            Some(hand) => legality::legal_actions(hand, self.player_hands.len()),
            None => Vec::new(),
        }
    }

    /// Finished when the last player hand busted, when a lone player hand is a
    /// blackjack, or when the dealer has reached the standing total.
    pub fn is_terminal(&self) -> bool {
        let last_hand_bust = self
            .player_hands
            .last()
            .map_or(false, |hand| hand.is_bust());
        let player_blackjack =
            self.player_hands.len() == 1 && self.player_hands[0].is_blackjack();
        let dealer_done = self.dealer_hand.value() >= DEALER_STAND_VALUE;
        last_hand_bust || player_blackjack || dealer_done
    }

    /// Deals 2 cards to the player and 1 to the dealer.
    #[allowed_turn(Player)]
    pub fn deal_initial(&self) -> Result<GameState> {
        if !self.dealer_hand.is_empty() || self.player_hands.iter().any(|hand| !hand.is_empty()) {
            return Err(GameError::HandsAlreadyDealt);
        }

        let mut next = self.clone();
        next.deal_player_card(0);
        next.deal_player_card(0);
        next.deal_dealer_card();
        debug!(
            player = %next.player_hands[0],
            dealer = %next.dealer_hand,
            "initial deal"
        );
        Ok(next)
    }

    #[allowed_turn(Player)]
    pub fn apply_player_action(&self, action: Action) -> Result<GameState> {
        let legal = self.legal_actions();
        if !legal.contains(&action) {
            return Err(GameError::IllegalAction { action, legal });
        }

        let mut next = self.clone();
        match action {
            Action::Hit => {
                next.deal_player_card(next.hand_index);
                if next.player_hands[next.hand_index].is_bust() {
                    next.hand_index += 1;
                }
                if next.hand_index == next.player_hands.len() {
                    next.turn = Turn::Dealer;
                }
            }
            Action::Stand => {
                if next.hand_index == next.player_hands.len() - 1 {
                    next.turn = Turn::Dealer;
                } else {
                    next.hand_index += 1;
                }
            }
            Action::Split => next.split_current_hand()?,
            Action::Double => {
                next.bets[next.hand_index] *= 2;
                next.deal_player_card(next.hand_index);
                next.turn = Turn::Dealer;
            }
        }
        debug!(
            ?action,
            hand_index = self.hand_index,
            hands = ?next.player_hands.iter().map(|hand| hand.to_string()).collect::<Vec<_>>(),
            "player action"
        );
        Ok(next)
    }

    #[allowed_turn(Dealer)]
    pub fn apply_dealer_action(&self, action: Action) -> Result<GameState> {
        let mut next = self.clone();
        match action {
            Action::Hit => next.deal_dealer_card(),
            Action::Stand => {}
            Action::Double | Action::Split => {
                return Err(GameError::IllegalDealerAction { action });
            }
        }
        debug!(?action, dealer = %next.dealer_hand, "dealer action");
        Ok(next)
    }

    /// Decides every player hand against the dealer. A player blackjack is checked
    /// against the dealer's second card, dealt here if the dealer only has one.
    pub fn settle(&self) -> Result<Settlement> {
        if !self.is_terminal() {
            return Err(GameError::NotTerminal);
        }

        let mut state = self.clone();
        if state.dealer_hand.len() == 1 && state.player_hands.iter().any(|h| h.is_blackjack()) {
            state.deal_dealer_card();
        }

        let outcomes: Vec<WinState> = state
            .player_hands
            .iter()
            .map(|hand| win_state(hand, &state.dealer_hand))
            .collect();
        let payouts: Vec<f64> = outcomes
            .iter()
            .zip(&state.bets)
            .map(|(outcome, &bet)| outcome.payout(bet, &state.rule))
            .collect();
        debug!(?outcomes, ?payouts, dealer = %state.dealer_hand, "round settled");

        Ok(Settlement {
            state,
            outcomes,
            payouts,
        })
    }

    /// Starts the next round: empty hands, one flat bet, bankroll moved by `payout`.
    pub fn apply_payout(&self, payout: f64) -> GameState {
        GameState {
            rule: self.rule,
            dealer_hand: Hand::new(),
            player_hands: vec![Hand::new()],
            bets: vec![self.rule.base_bet],
            hand_index: 0,
            turn: Turn::Player,
            bankroll: self.bankroll + payout,
            deck: self.deck.clone(),
        }
    }

    fn split_current_hand(&mut self) -> Result<()> {
        let (mut first, mut second) = self.player_hands[self.hand_index]
            .split_pair()
            .ok_or(GameError::SplitNonPair)?;
        first.receive_card(self.deck.deal_card());
        second.receive_card(self.deck.deal_card());

        self.player_hands[self.hand_index] = first;
        self.player_hands.insert(self.hand_index + 1, second);
        self.bets.insert(self.hand_index + 1, self.rule.base_bet);
        Ok(())
    }

    fn deal_player_card(&mut self, hand_index: usize) {
        let card = self.deck.deal_card();
        trace!(%card, hand_index, "player dealt");
        self.player_hands[hand_index].receive_card(card);
    }

    fn deal_dealer_card(&mut self) {
        let card = self.deck.deal_card();
        trace!(%card, "dealer dealt");
        self.dealer_hand.receive_card(card);
    }
}

fn win_state(hand: &Hand, dealer_hand: &Hand) -> WinState {
    if hand.is_blackjack() {
        return if dealer_hand.is_blackjack() {
            WinState::Push
        } else {
            WinState::Blackjack
        };
    }
    if hand.is_bust() {
        return WinState::Lose;
    }
    match hand.value().cmp(&dealer_hand.value()) {
        Ordering::Greater => WinState::Win,
        Ordering::Less if dealer_hand.is_bust() => WinState::Win,
        Ordering::Less => WinState::Lose,
        Ordering::Equal => WinState::Push,
    }
}
