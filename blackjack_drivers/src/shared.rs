mod console;
mod policy_csv;
mod q_table_csv;

use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context};
use blackjack::q_learning::QLearningParams;
use blackjack::StrategyKind;
use serde::{Deserialize, Serialize};

pub use console::{parse_action, prompt_action};
pub use policy_csv::{parse_policy, read_policy_file};
pub use q_table_csv::{write_q_table, write_q_table_file};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rule: ConfigRule,
    pub session: ConfigSession,
    pub q_learning: ConfigQLearning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRule {
    pub base_bet: u32,
    pub payout_blackjack: f64,
}

impl Default for ConfigRule {
    fn default() -> Self {
        let rule = blackjack::Rule::default();
        ConfigRule {
            base_bet: rule.base_bet,
            payout_blackjack: rule.payout_blackjack,
        }
    }
}

impl TryInto<blackjack::Rule> for ConfigRule {
    type Error = anyhow::Error;

    fn try_into(self) -> Result<blackjack::Rule, Self::Error> {
        ensure!(self.base_bet > 0, "base_bet must be positive");
        ensure!(
            self.payout_blackjack > 0.0,
            "payout_blackjack must be positive, got {}",
            self.payout_blackjack
        );
        Ok(blackjack::Rule {
            base_bet: self.base_bet,
            payout_blackjack: self.payout_blackjack,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSession {
    /// One of user, optimal, expectimax, random, qlearning.
    pub strategy: String,
    pub starting_money: f64,
    /// Hands played after training, the ones that are reported.
    pub testing_hands: u64,
    /// Hands the Q-learning player explores before testing. Ignored by the others.
    pub training_hands: u64,
    /// Fixes every random source of the session when set.
    pub seed: Option<u64>,
    /// CSV rule table for the optimal strategy. The built-in table when unset.
    pub policy_file: Option<PathBuf>,
    /// Where the Q-learning player's table is written after the session.
    pub q_table_file: Option<PathBuf>,
}

impl Default for ConfigSession {
    fn default() -> Self {
        ConfigSession {
            strategy: String::from("optimal"),
            starting_money: 1000.0,
            testing_hands: 1000,
            training_hands: 0,
            seed: None,
            policy_file: None,
            q_table_file: None,
        }
    }
}

impl ConfigSession {
    /// Accepts `q-learning` as a spelling of `qlearning`.
    pub fn strategy_kind(&self) -> Result<StrategyKind, serde::de::value::Error> {
        self.strategy.to_lowercase().replace('-', "").parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigQLearning {
    pub discount: f64,
    pub omega: f64,
}

impl Default for ConfigQLearning {
    fn default() -> Self {
        let params = QLearningParams::default();
        ConfigQLearning {
            discount: params.discount,
            omega: params.omega,
        }
    }
}

impl TryInto<QLearningParams> for ConfigQLearning {
    type Error = anyhow::Error;

    fn try_into(self) -> Result<QLearningParams, Self::Error> {
        ensure!(
            (0.0..=1.0).contains(&self.discount),
            "discount must be within [0, 1], got {}",
            self.discount
        );
        ensure!(self.omega > 0.0, "omega must be positive, got {}", self.omega);
        Ok(QLearningParams {
            discount: self.discount,
            omega: self.omega,
        })
    }
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> anyhow::Result<Config> {
    let file_content = fs::read_to_string(filename)
        .with_context(|| format!("cannot read config file {}", filename))?;
    parse_config(&file_content).with_context(|| format!("invalid config file {}", filename))
}

pub fn parse_config(content: &str) -> anyhow::Result<Config> {
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn get_typical_config_rule() -> ConfigRule {
        ConfigRule {
            base_bet: 25,
            payout_blackjack: 1.2,
        }
    }

    #[test]
    fn can_convert_rule() {
        let config_rule = get_typical_config_rule();
        let converted_rule: blackjack::Rule = config_rule.try_into().unwrap();
        assert_eq!(converted_rule.base_bet, 25);
        assert_eq!(converted_rule.payout_blackjack, 1.2);
    }

    #[test]
    fn should_return_error_when_converting_rule() {
        let mut config_rule = get_typical_config_rule();
        config_rule.base_bet = 0;
        let convert_result: Result<blackjack::Rule, anyhow::Error> = config_rule.try_into();
        assert!(convert_result.is_err());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config = parse_config("session:\n  strategy: expectimax\n  seed: 7\n").unwrap();
        assert_eq!(config.session.strategy_kind().unwrap(), StrategyKind::Expectimax);
        assert_eq!(config.session.seed, Some(7));
        assert_eq!(config.session.starting_money, 1000.0);
        assert_eq!(config.rule.base_bet, 10);
        assert_eq!(config.q_learning.discount, 0.3);
        assert_eq!(config.q_learning.omega, 0.97);
    }

    #[test]
    fn strategy_names_are_lenient() {
        let mut session = ConfigSession::default();
        assert_eq!(session.strategy_kind().unwrap(), StrategyKind::Optimal);
        session.strategy = String::from("Q-Learning");
        assert_eq!(session.strategy_kind().unwrap(), StrategyKind::QLearning);
        session.strategy = String::from("card-counting");
        assert!(session.strategy_kind().is_err());
    }

    #[test]
    fn q_learning_params_are_checked() {
        let params: QLearningParams = ConfigQLearning::default().try_into().unwrap();
        assert_eq!(params, QLearningParams::default());
        let bad = ConfigQLearning {
            discount: 1.5,
            omega: 0.97,
        };
        let converted: Result<QLearningParams, anyhow::Error> = bad.try_into();
        assert!(converted.is_err());
    }

    #[test]
    fn reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "rule:\n  base_bet: 5\n  payout_blackjack: 1.5\nsession:\n  strategy: qlearning\n  training_hands: 500\n  q_table_file: /tmp/q.csv\n"
        )
        .unwrap();
        let config = parse_config_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.rule.base_bet, 5);
        assert_eq!(config.session.training_hands, 500);
        assert_eq!(config.session.q_table_file, Some(PathBuf::from("/tmp/q.csv")));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        assert!(parse_config_from_file(path.to_str().unwrap()).is_err());
    }
}
