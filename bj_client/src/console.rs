//! Line-oriented presenter over any reader/writer pair.

use private_blackjack::{BetRules, Presenter, SessionId, SessionRecord, SessionSummary};
use std::io::{self, BufRead, Write};

/// Status line of a table without a session.
pub const EMPTY_TABLE: &str = "Player: 0 | Dealer: ? | Balance: 0 | Cards left: 0";

/// Render a record (or the empty table) as text.
///
/// Dealer cards the player may not see yet are shown as `[hidden]`.
pub fn render_table(record: Option<&SessionRecord>) -> String {
    let Some(record) = record else {
        return EMPTY_TABLE.to_string();
    };

    let dealer_value = record
        .dealer_value()
        .map_or_else(|| "?".to_string(), |v| v.to_string());
    let mut dealer: Vec<&str> = record
        .visible_dealer_cards()
        .iter()
        .map(String::as_str)
        .collect();
    let hidden = record.dealer_cards().len() - dealer.len();
    dealer.extend(std::iter::repeat_n("[hidden]", hidden));

    format!(
        "Player: {} | Dealer: {} | Balance: {} | Cards left: {}\n  Your cards:   {}\n  Dealer cards: {}",
        record.player_value(),
        dealer_value,
        record.balance(),
        record.cards_remaining(),
        cards(record.player_cards().iter().map(String::as_str)),
        cards(dealer.into_iter()),
    )
}

fn cards<'a>(cards: impl Iterator<Item = &'a str>) -> String {
    let joined = cards.collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "-".to_string() } else { joined }
}

/// Text presenter used by the `bj_client` binary.
///
/// Reads answers from `input` and writes everything to `output`. A blank
/// answer or end of input cancels a prompt.
#[derive(Debug)]
pub struct ConsolePresenter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePresenter<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Write `prompt` and read one line. `None` at end of input.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures of either stream.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Read the next command line.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures of either stream.
    pub fn read_command(&mut self) -> io::Result<Option<String>> {
        self.read_line("> ")
    }

    /// Write one line of output.
    pub fn say(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{text}") {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }

    /// Prompt that treats a blank line, end of input and I/O errors as cancel.
    fn ask(&mut self, prompt: &str) -> Option<String> {
        match self.read_line(prompt) {
            Ok(Some(answer)) if !answer.is_empty() => Some(answer),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Failed to read from console: {}", e);
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> Presenter for ConsolePresenter<R, W> {
    fn show(&mut self, record: Option<&SessionRecord>) {
        let table = render_table(record);
        self.say(&table);
    }

    fn show_error(&mut self, message: &str) {
        self.say(&format!("[error] {message}"));
    }

    fn show_info(&mut self, message: &str) {
        self.say(message);
    }

    fn prompt_bet(&mut self, rules: &BetRules) -> Option<String> {
        self.ask(&format!("{} ", rules.prompt()))
    }

    fn prompt_session_choice(&mut self, sessions: &[SessionSummary]) -> Option<SessionId> {
        self.say("Saved sessions:");
        for (i, session) in sessions.iter().enumerate() {
            self.say(&format!("  {}. {}", i + 1, session.label()));
        }

        loop {
            let answer = self.ask(&format!(
                "Select session (1-{}, blank to cancel): ",
                sessions.len()
            ))?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=sessions.len()).contains(&n) => {
                    return Some(sessions[n - 1].session_id);
                }
                _ => self.show_error(&format!("Invalid selection '{answer}'")),
            }
        }
    }

    fn confirm_play_again(&mut self, _record: &SessionRecord) -> bool {
        self.ask("Play again? [y/N]: ")
            .is_some_and(|a| matches!(a.to_lowercase().as_str(), "y" | "yes"))
    }
}
