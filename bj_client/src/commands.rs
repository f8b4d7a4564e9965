//! Typed command parsing for the text client.

use private_blackjack::Intent;
use std::fmt;

/// Everything the player can type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forwarded to the session controller.
    Play(Intent),
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Bet command without an amount.
    BetMissingAmount,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BetMissingAmount => {
                write!(f, "Bet requires an amount (e.g., 'bet 50')")
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  new, n            Start a new game
  reconnect, r      Resume a saved session
  bet, b AMOUNT     Place a bet
  hit, h            Draw a card
  stand, s          End your turn
  again             Play another round
  stop              Save and leave the table
  help, ?           Show this help
  quit, exit, q     Leave the client
";

/// Parse a typed line into a [`Command`].
///
/// The bet amount is passed through as typed; the session rules decide
/// whether it is acceptable.
///
/// # Examples
///
/// ```
/// use bj_client::commands::{parse_command, Command};
/// use private_blackjack::Intent;
///
/// assert_eq!(parse_command("h"), Ok(Command::Play(Intent::Hit)));
/// assert_eq!(
///     parse_command("bet 50"),
///     Ok(Command::Play(Intent::PlaceBet("50".to_string())))
/// );
/// assert_eq!(parse_command("quit"), Ok(Command::Quit));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    // Single-word commands first
    match trimmed.to_lowercase().as_str() {
        "new" | "n" => return Ok(Command::Play(Intent::StartNewGame)),
        "reconnect" | "r" => return Ok(Command::Play(Intent::Reconnect)),
        "hit" | "h" => return Ok(Command::Play(Intent::Hit)),
        "stand" | "s" => return Ok(Command::Play(Intent::Stand)),
        "again" => return Ok(Command::Play(Intent::PlayAgain)),
        "stop" => return Ok(Command::Play(Intent::Stop)),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first().map(|p| p.to_lowercase()).as_deref() {
        Some("bet" | "b") => parse_bet_command(&parts),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse a bet command: "bet AMOUNT"
fn parse_bet_command(parts: &[&str]) -> Result<Command, ParseError> {
    match parts.get(1) {
        Some(amount) => Ok(Command::Play(Intent::PlaceBet((*amount).to_string()))),
        None => Err(ParseError::BetMissingAmount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Single-word command tests ===

    #[test]
    fn test_parse_new() {
        assert_eq!(parse_command("new"), Ok(Command::Play(Intent::StartNewGame)));
        assert_eq!(parse_command("n"), Ok(Command::Play(Intent::StartNewGame)));
    }

    #[test]
    fn test_parse_reconnect() {
        assert_eq!(parse_command("reconnect"), Ok(Command::Play(Intent::Reconnect)));
        assert_eq!(parse_command("r"), Ok(Command::Play(Intent::Reconnect)));
    }

    #[test]
    fn test_parse_hit_and_stand() {
        assert_eq!(parse_command("hit"), Ok(Command::Play(Intent::Hit)));
        assert_eq!(parse_command("h"), Ok(Command::Play(Intent::Hit)));
        assert_eq!(parse_command("stand"), Ok(Command::Play(Intent::Stand)));
        assert_eq!(parse_command("s"), Ok(Command::Play(Intent::Stand)));
    }

    #[test]
    fn test_parse_round_end() {
        assert_eq!(parse_command("again"), Ok(Command::Play(Intent::PlayAgain)));
        assert_eq!(parse_command("stop"), Ok(Command::Play(Intent::Stop)));
    }

    #[test]
    fn test_parse_help_and_quit() {
        assert_eq!(parse_command("help"), Ok(Command::Help));
        assert_eq!(parse_command("?"), Ok(Command::Help));
        for input in ["quit", "exit", "q"] {
            assert_eq!(parse_command(input), Ok(Command::Quit));
        }
    }

    // === Bet tests ===

    #[test]
    fn test_parse_bet() {
        assert_eq!(
            parse_command("bet 50"),
            Ok(Command::Play(Intent::PlaceBet("50".to_string())))
        );
        assert_eq!(
            parse_command("b 1010"),
            Ok(Command::Play(Intent::PlaceBet("1010".to_string())))
        );
    }

    #[test]
    fn test_parse_bet_keeps_invalid_amount() {
        // Rejection is the session rules' job, not the parser's.
        assert_eq!(
            parse_command("bet -10"),
            Ok(Command::Play(Intent::PlaceBet("-10".to_string())))
        );
        assert_eq!(
            parse_command("bet ten"),
            Ok(Command::Play(Intent::PlaceBet("ten".to_string())))
        );
    }

    #[test]
    fn test_parse_bet_missing_amount() {
        assert_eq!(parse_command("bet"), Err(ParseError::BetMissingAmount));
        assert_eq!(parse_command("b"), Err(ParseError::BetMissingAmount));
    }

    // === Edge cases ===

    #[test]
    fn test_parse_whitespace_and_case() {
        assert_eq!(parse_command("  HIT  "), Ok(Command::Play(Intent::Hit)));
        assert_eq!(
            parse_command("  Bet   20 "),
            Ok(Command::Play(Intent::PlaceBet("20".to_string())))
        );
    }

    #[test]
    fn test_parse_unrecognized() {
        let result = parse_command("double");
        assert_eq!(
            result,
            Err(ParseError::UnrecognizedCommand("double".to_string()))
        );
        assert!(result.unwrap_err().to_string().contains("help"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            parse_command("   "),
            Err(ParseError::UnrecognizedCommand(_))
        ));
    }

    #[test]
    fn test_help_lists_every_command() {
        for word in ["new", "reconnect", "bet", "hit", "stand", "again", "stop", "quit"] {
            assert!(HELP.contains(word), "help is missing {word}");
        }
    }
}
