//! Rule tables stored as CSV.
//!
//! The first line is a header and is skipped. Every other line reads
//! `player_value,hand_type,a2,a3,...,a11`: `hand_type` is one of `hard`, `soft`
//! or `double`, and the ten codes are the entries for dealer values 2 through 11.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context};
use blackjack::strategy::{HandClass, PolicyTable};
use blackjack::Action;

const DEALER_VALUES: std::ops::RangeInclusive<u8> = 2..=11;

fn actions_for_code(code: &str) -> anyhow::Result<Vec<Action>> {
    let actions = match code.trim() {
        "0" => vec![Action::Hit],
        "1" => vec![Action::Stand],
        "2" => vec![Action::Double],
        "3" => vec![Action::Split],
        "4" => vec![Action::Double, Action::Hit],
        "5" => vec![Action::Double, Action::Stand],
        other => bail!("unknown action code {:?}", other),
    };
    Ok(actions)
}

pub fn parse_policy(content: &str) -> anyhow::Result<PolicyTable> {
    let mut table = PolicyTable::new();
    for (line_number, line) in content.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        parse_row(&mut table, line).with_context(|| format!("line {}", line_number + 1))?;
    }
    Ok(table)
}

fn parse_row(table: &mut PolicyTable, line: &str) -> anyhow::Result<()> {
    let fields: Vec<&str> = line.split(',').collect();
    ensure!(
        fields.len() == 2 + DEALER_VALUES.count(),
        "expected {} fields, found {}",
        2 + DEALER_VALUES.count(),
        fields.len()
    );

    let player_value: u8 = fields[0]
        .trim()
        .parse()
        .with_context(|| format!("invalid player value {:?}", fields[0]))?;
    let class: HandClass = fields[1]
        .trim()
        .parse()
        .map_err(|_| anyhow!("invalid hand type {:?}", fields[1]))?;

    for (dealer_value, code) in DEALER_VALUES.zip(&fields[2..]) {
        table.insert(class, player_value, dealer_value, actions_for_code(code)?);
    }
    Ok(())
}

pub fn read_policy_file(path: &Path) -> anyhow::Result<PolicyTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read policy file {}", path.display()))?;
    parse_policy(&content).with_context(|| format!("invalid policy file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "playerValue,handType,2,3,4,5,6,7,8,9,10,11\n";

    #[test]
    fn parses_rows_into_fallback_lists() {
        let content = format!(
            "{}11,hard,4,4,4,4,4,4,4,4,4,0\n18,soft,1,5,5,5,5,1,1,0,0,0\n8,double,3,3,3,3,3,3,3,3,3,3\n",
            HEADER
        );
        let table = parse_policy(&content).unwrap();
        assert_eq!(table.len(), 30);
        assert_eq!(
            table.lookup(HandClass::Hard, 11, 10).unwrap(),
            &[Action::Double, Action::Hit]
        );
        assert_eq!(table.lookup(HandClass::Hard, 11, 11).unwrap(), &[Action::Hit]);
        assert_eq!(
            table.lookup(HandClass::Soft, 18, 3).unwrap(),
            &[Action::Double, Action::Stand]
        );
        assert_eq!(table.lookup(HandClass::Double, 8, 2).unwrap(), &[Action::Split]);
        assert!(table.lookup(HandClass::Hard, 12, 2).is_err());
    }

    #[test]
    fn header_and_blank_lines_are_skipped() {
        let content = format!("{}\n17,hard,1,1,1,1,1,1,1,1,1,1\n\n", HEADER);
        assert_eq!(parse_policy(&content).unwrap().len(), 10);
    }

    #[test]
    fn unknown_code_is_an_error() {
        let content = format!("{}17,hard,1,1,1,1,9,1,1,1,1,1\n", HEADER);
        let message = format!("{:#}", parse_policy(&content).unwrap_err());
        assert!(message.contains("line 2"));
        assert!(message.contains("unknown action code"));
    }

    #[test]
    fn malformed_rows_are_errors() {
        assert!(parse_policy(&format!("{}17,hard,1,1,1\n", HEADER)).is_err());
        assert!(parse_policy(&format!("{}17,pair,1,1,1,1,1,1,1,1,1,1\n", HEADER)).is_err());
        assert!(parse_policy(&format!("{}x,hard,1,1,1,1,1,1,1,1,1,1\n", HEADER)).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_policy_file(&dir.path().join("optimal.csv")).is_err());
    }
}
