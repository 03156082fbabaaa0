use std::io::{self, BufRead, Write};

use anyhow::Context;
use blackjack::q_learning::{QLearningParams, QLearningStrategy};
use blackjack::simulation::{
    GameState, InfiniteDeck, Session, SessionEventHandler, SessionReport, Settlement,
};
use blackjack::strategy::{
    BasicStrategy, ExpectimaxStrategy, InteractiveStrategy, PolicyTable, RandomStrategy,
};
use blackjack::{Action, Rule, StrategyKind, WinState};
use blackjack_drivers::{prompt_action, read_policy_file, write_q_table_file, Config};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default)]
struct Handler {
    round: u64,
    decisions: Vec<Vec<String>>,
    /// A person is playing: show results on the console and ask before each round.
    interactive: bool,
}

impl Handler {
    fn new(interactive: bool) -> Handler {
        Handler {
            interactive,
            ..Default::default()
        }
    }

    fn decisions_for(&mut self, hand_index: usize) -> &mut Vec<String> {
        while self.decisions.len() <= hand_index {
            self.decisions.push(Vec::new());
        }
        &mut self.decisions[hand_index]
    }
}

impl SessionEventHandler for Handler {
    fn on_round_begin(&mut self, state: &GameState) {
        self.round += 1;
        self.decisions.clear();
        debug!(round = self.round, bankroll = state.bankroll(), "new round");
    }

    fn on_player_decision(&mut self, state: &GameState, action: Action) {
        self.decisions_for(state.hand_index())
            .push(action.to_string());
    }

    fn on_dealer_action(&mut self, state: &GameState, action: Action) {
        debug!(?action, dealer = %state.dealer_hand(), "dealer");
    }

    fn on_round_summary(&mut self, settlement: &Settlement, recorded: bool) {
        let state = &settlement.state;
        debug!(round = self.round, recorded, dealer = %state.dealer_hand(), "round summary");
        for (index, hand) in state.player_hands().iter().enumerate() {
            let decisions = self.decisions.get(index).map(|d| d.join(" ")).unwrap_or_default();
            debug!(
                hand = index,
                cards = %hand,
                decisions = %decisions,
                outcome = %settlement.outcomes[index],
                payout = settlement.payouts[index],
                "player hand"
            );
        }

        if self.interactive {
            println!("Dealer: {}", state.dealer_hand());
            for (index, hand) in state.player_hands().iter().enumerate() {
                println!(
                    "Hand {}: {} -> {} ({:+})",
                    index, hand, settlement.outcomes[index], settlement.payouts[index]
                );
            }
            println!("Money: {}", state.bankroll() + settlement.total_payout());
        }
    }

    fn wants_another_round(&mut self) -> bool {
        if !self.interactive {
            return true;
        }
        print!("Another hand? y/n ---> ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => !matches!(line.trim(), "n" | "N" | "no"),
        }
    }
}

fn rng_for(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}

fn report_performance(report: &SessionReport) {
    info!(
        "Counting all splits as two hands, there were {} hands played by the agent who started with ${}",
        report.hands(),
        report.starting_bankroll
    );
    info!(
        "Most money ever had: {}  Least money ever had: {}",
        report.highest_bankroll, report.lowest_bankroll
    );
    info!("Money remaining after all hands: ${}", report.bankroll);
    match report.house_edge() {
        Some(edge) => info!(
            "Total winnings {} on total bets of {} for a house edge of {:.1}%",
            report.total_payout,
            report.total_bet,
            edge * 100.0
        ),
        None => info!("Nothing was wagered"),
    }
    for outcome in [WinState::Win, WinState::Blackjack, WinState::Push, WinState::Lose] {
        info!(
            "{} : {} ({:.1}%)",
            outcome,
            report.outcomes.get(outcome),
            report.fraction(outcome) * 100.0
        );
    }
}

/// Only a learning strategy has a use for training rounds.
fn training_rounds(kind: StrategyKind, training_hands: u64) -> u64 {
    match kind {
        StrategyKind::QLearning => training_hands,
        _ => {
            if training_hands > 0 {
                warn!(
                    strategy = %kind,
                    training_hands,
                    "training hands only apply to qlearning, ignoring them"
                );
            }
            0
        }
    }
}

pub fn run_session(config: &Config) -> anyhow::Result<SessionReport> {
    let rule: Rule = config.rule.clone().try_into()?;
    let params: QLearningParams = config.q_learning.clone().try_into()?;
    let session_config = &config.session;
    let kind = session_config
        .strategy_kind()
        .with_context(|| format!("unknown strategy {:?}", session_config.strategy))?;

    let training = training_rounds(kind, session_config.training_hands);
    let rounds = session_config.testing_hands + training;
    info!(
        "{} test {} train {} total",
        session_config.testing_hands, training, rounds
    );

    let deck = InfiniteDeck::new(rng_for(session_config.seed, 0));
    let mut session = Session::new(&rule, session_config.starting_money, rounds, deck);
    let mut handler = Handler::new(kind == StrategyKind::User);

    let report = match kind {
        StrategyKind::User => {
            let mut strategy = InteractiveStrategy::new(|state: &GameState, legal: &[Action]| {
                prompt_action(state, legal, &mut io::stdin().lock(), &mut io::stdout())
                    .unwrap_or_else(|err| {
                        error!(%err, "cannot read action, standing");
                        Action::Stand
                    })
            });
            session.run(&mut strategy, &mut handler)?
        }
        StrategyKind::Optimal => {
            let table = match &session_config.policy_file {
                Some(path) => read_policy_file(path)?,
                None => PolicyTable::basic(),
            };
            session.run(&mut BasicStrategy::new(table), &mut handler)?
        }
        StrategyKind::Expectimax => session.run(&mut ExpectimaxStrategy::default(), &mut handler)?,
        StrategyKind::Random => {
            let mut strategy = RandomStrategy::new(rng_for(session_config.seed, 1));
            session.run(&mut strategy, &mut handler)?
        }
        StrategyKind::QLearning => {
            let mut agent =
                QLearningStrategy::new(params, training, rng_for(session_config.seed, 2));
            let report = session.run(&mut agent, &mut handler)?;
            if let Some(path) = &session_config.q_table_file {
                write_q_table_file(agent.table(), path)?;
                let params = agent.table().params();
                info!(
                    states = agent.table().len(),
                    discount = params.discount,
                    omega = params.omega,
                    path = %path.display(),
                    "Q-table written"
                );
            }
            report
        }
    };

    report_performance(&report);
    Ok(report)
}
