use tracing::{debug, info};

use super::game_state::Settlement;
use super::{GameState, InfiniteDeck};
use crate::{
    error::Result,
    strategy::{DealerStrategy, Strategy},
    Action, Rule, WinState,
};

/// Callbacks fired while a session plays its rounds.
pub trait SessionEventHandler {
    fn on_round_begin(&mut self, state: &GameState);
    /// `state` is the state the decision was made in.
    fn on_player_decision(&mut self, state: &GameState, action: Action);
    /// `state` is the state after the dealer acted.
    fn on_dealer_action(&mut self, state: &GameState, action: Action);
    /// `recorded` is false for rounds left out of the report (training rounds).
    fn on_round_summary(&mut self, settlement: &Settlement, recorded: bool);
    /// Asked after every round. Returning false ends the session early.
    fn wants_another_round(&mut self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub win: u64,
    pub blackjack: u64,
    pub push: u64,
    pub lose: u64,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: WinState) {
        *self.get_mut(outcome) += 1;
    }

    pub fn get(&self, outcome: WinState) -> u64 {
        match outcome {
            WinState::Win => self.win,
            WinState::Blackjack => self.blackjack,
            WinState::Push => self.push,
            WinState::Lose => self.lose,
        }
    }

    fn get_mut(&mut self, outcome: WinState) -> &mut u64 {
        match outcome {
            WinState::Win => &mut self.win,
            WinState::Blackjack => &mut self.blackjack,
            WinState::Push => &mut self.push,
            WinState::Lose => &mut self.lose,
        }
    }

    /// Every split hand counts on its own.
    pub fn total(&self) -> u64 {
        self.win + self.blackjack + self.push + self.lose
    }
}

/// Aggregates over the recorded rounds of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub starting_bankroll: f64,
    pub outcomes: OutcomeCounts,
    pub total_bet: u64,
    pub total_payout: f64,
    pub bankroll: f64,
    pub highest_bankroll: f64,
    pub lowest_bankroll: f64,
}

impl SessionReport {
    fn new(starting_bankroll: f64) -> SessionReport {
        SessionReport {
            starting_bankroll,
            outcomes: OutcomeCounts::default(),
            total_bet: 0,
            total_payout: 0.0,
            bankroll: starting_bankroll,
            highest_bankroll: starting_bankroll,
            lowest_bankroll: starting_bankroll,
        }
    }

    fn record(&mut self, settlement: &Settlement, bankroll: f64) {
        for &outcome in &settlement.outcomes {
            self.outcomes.record(outcome);
        }
        self.total_bet += settlement.total_bet() as u64;
        self.total_payout += settlement.total_payout();
        self.highest_bankroll = self.highest_bankroll.max(bankroll);
        self.lowest_bankroll = self.lowest_bankroll.min(bankroll);
    }

    pub fn hands(&self) -> u64 {
        self.outcomes.total()
    }

    /// The share of `outcome` among all recorded hands.
    pub fn fraction(&self, outcome: WinState) -> f64 {
        match self.hands() {
            0 => 0.0,
            hands => self.outcomes.get(outcome) as f64 / hands as f64,
        }
    }

    /// What the house kept per unit wagered. None before anything was wagered.
    pub fn house_edge(&self) -> Option<f64> {
        (self.total_bet > 0).then(|| -self.total_payout / self.total_bet as f64)
    }
}

/// Plays flat-bet rounds for one player against the dealer until the round
/// budget is spent or the bankroll runs out.
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    dealer: DealerStrategy,
    rounds: u64,
    rounds_played: u64,
    report: SessionReport,
}

impl Session {
    /// `rounds` covers training and testing rounds alike.
    pub fn new(rule: &Rule, starting_bankroll: f64, rounds: u64, deck: InfiniteDeck) -> Session {
        Session {
            state: GameState::new(rule, starting_bankroll, deck),
            dealer: DealerStrategy,
            rounds,
            rounds_played: 0,
            report: SessionReport::new(starting_bankroll),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    pub fn report(&self) -> &SessionReport {
        &self.report
    }

    pub fn is_over(&self) -> bool {
        self.rounds_played >= self.rounds || self.state.bankroll() <= 0.0
    }

    /// Deals one round, plays it to the end with `strategy` and the house rule,
    /// then settles it and moves the bankroll.
    pub fn play_round<S, H>(&mut self, strategy: &mut S, handler: &mut H) -> Result<Settlement>
    where
        S: Strategy + ?Sized,
        H: SessionEventHandler + ?Sized,
    {
        handler.on_round_begin(&self.state);
        let recorded = !strategy.is_training();

        let mut state = self.state.deal_initial()?;
        while !state.is_terminal() {
            if state.is_player_turn() {
                let action = strategy.make_decision(&state)?;
                let next = state.apply_player_action(action)?;
                handler.on_player_decision(&state, action);
                strategy.observe_transition(&state, action, &next)?;
                state = next;
            } else {
                let action = self.dealer.decide(&state);
                state = state.apply_dealer_action(action)?;
                handler.on_dealer_action(&state, action);
            }
        }

        let settlement = state.settle()?;
        strategy.observe_payouts(&settlement.payouts)?;
        self.state = settlement.state.apply_payout(settlement.total_payout());
        self.rounds_played += 1;

        self.report.bankroll = self.state.bankroll();
        if recorded {
            self.report.record(&settlement, self.state.bankroll());
        }
        debug!(
            round = self.rounds_played,
            payout = settlement.total_payout(),
            bankroll = self.state.bankroll(),
            recorded,
            "round finished"
        );
        handler.on_round_summary(&settlement, recorded);
        Ok(settlement)
    }

    /// Plays rounds until the session is over or the handler stops it.
    pub fn run<S, H>(&mut self, strategy: &mut S, handler: &mut H) -> Result<SessionReport>
    where
        S: Strategy + ?Sized,
        H: SessionEventHandler + ?Sized,
    {
        while !self.is_over() {
            self.play_round(strategy, handler)?;
            if !handler.wants_another_round() {
                break;
            }
        }
        info!(
            rounds = self.rounds_played,
            hands = self.report.hands(),
            bankroll = self.report.bankroll,
            "session finished"
        );
        Ok(self.report.clone())
    }
}
