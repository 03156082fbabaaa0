use std::io::{self, BufRead, Write};

use blackjack::simulation::GameState;
use blackjack::Action;

const HELP: &str =
    "HIT: 'h' or 'hit', STAND: 's' or 'stand', SPLIT: 'sp' or 'split', DOUBLE: 'd' or 'double'";

/// Maps a typed command to an action, if that action is in `legal`.
pub fn parse_action(input: &str, legal: &[Action]) -> Option<Action> {
    let action = match input.trim().to_lowercase().as_str() {
        "h" | "hit" => Action::Hit,
        "s" | "stand" => Action::Stand,
        "sp" | "split" => Action::Split,
        "d" | "double" => Action::Double,
        _ => return None,
    };
    legal.contains(&action).then_some(action)
}

/// Shows the table and asks until a legal action is typed.
pub fn prompt_action<R: BufRead, W: Write>(
    state: &GameState,
    legal: &[Action],
    input: &mut R,
    output: &mut W,
) -> io::Result<Action> {
    for (index, hand) in state.player_hands().iter().enumerate() {
        let marker = if index == state.hand_index() { "*" } else { " " };
        writeln!(output, "{} Player hand {}: {}", marker, index, hand)?;
    }
    writeln!(output, "  Dealer shows: {}", state.dealer_hand())?;
    let names: Vec<String> = legal.iter().map(|action| action.to_string()).collect();
    writeln!(output, "Your move! You may choose one of {}", names.join(", "))?;

    let mut line = String::new();
    loop {
        write!(output, "---> ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"));
        }
        match parse_action(&line, legal) {
            Some(action) => return Ok(action),
            None => writeln!(output, "Unrecognized or invalid action, please try again\n {}", HELP)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use blackjack::simulation::{Card, InfiniteDeck, Rank, Suit};
    use blackjack::Rule;

    use super::*;

    #[test]
    fn parses_short_and_long_commands() {
        let legal = [Action::Hit, Action::Stand, Action::Double, Action::Split];
        assert_eq!(parse_action("h\n", &legal), Some(Action::Hit));
        assert_eq!(parse_action(" Stand ", &legal), Some(Action::Stand));
        assert_eq!(parse_action("sp", &legal), Some(Action::Split));
        assert_eq!(parse_action("double", &legal), Some(Action::Double));
        assert_eq!(parse_action("surrender", &legal), None);
        assert_eq!(parse_action("sp", &legal[..2]), None);
    }

    #[test]
    fn prompt_repeats_until_legal() {
        let deck = InfiniteDeck::with_seed(1).with_firsts([
            Card::new(Rank::Nine, Suit::Heart),
            Card::new(Rank::Four, Suit::Club),
            Card::new(Rank::Six, Suit::Spade),
        ]);
        let state = GameState::new(&Rule::default(), 100.0, deck)
            .deal_initial()
            .unwrap();
        let legal = state.legal_actions();

        let mut input = "split\nx\nd\n".as_bytes();
        let mut output = Vec::new();
        let action = prompt_action(&state, &legal, &mut input, &mut output).unwrap();
        assert_eq!(action, Action::Double);
        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches("Unrecognized").count(), 2);
        assert!(shown.contains("Hit, Stand, Double"));
    }

    #[test]
    fn prompt_fails_on_end_of_input() {
        let state = GameState::new(&Rule::default(), 100.0, InfiniteDeck::with_seed(2))
            .deal_initial()
            .unwrap();
        let legal = state.legal_actions();
        let mut input = "".as_bytes();
        let err = prompt_action(&state, &legal, &mut input, &mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
