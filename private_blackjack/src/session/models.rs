//! Session record types exchanged with the blackjack server.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::errors::ProtocolViolation;

/// Chip amounts (bets, balances).
pub type Chips = i64;

/// Identifier of a server-side session. Stable across resumes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Fresh random id. Only servers (and test doubles) assign ids.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First 8 hex characters, used in session labels.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SessionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Result of a resolved round as reported by the server.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
    Win,
    Lose,
    Push,
    Blackjack,
    Bust,
    /// Any label this client doesn't know about.
    Other(String),
}

impl From<String> for Outcome {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "WIN" => Self::Win,
            "LOSE" | "LOSS" => Self::Lose,
            "PUSH" => Self::Push,
            "BLACKJACK" => Self::Blackjack,
            "BUST" => Self::Bust,
            _ => Self::Other(value),
        }
    }
}

impl From<Outcome> for String {
    fn from(value: Outcome) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Win => "WIN",
            Self::Lose => "LOSE",
            Self::Push => "PUSH",
            Self::Blackjack => "BLACKJACK",
            Self::Bust => "BUST",
            Self::Other(label) => label,
        };
        write!(f, "{repr}")
    }
}

/// Session record exactly as it appears on the wire.
///
/// Anything the server may send as `null` is optional here. Nothing reads a
/// snapshot directly; it must be turned into a [`SessionRecord`] first.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Option<SessionId>,
    pub player_cards: Option<Vec<String>>,
    pub dealer_cards: Option<Vec<String>>,
    #[serde(default)]
    pub player_value: u32,
    pub dealer_value: Option<u32>,
    #[serde(default)]
    pub can_hit: bool,
    #[serde(default)]
    pub can_stand: bool,
    #[serde(default)]
    pub game_over: bool,
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub balance: Chips,
    #[serde(default)]
    pub cards_remaining: u32,
}

/// Validated, immutable snapshot of one round.
///
/// Produced only by [`SessionRecord::from_snapshot`]; a new server response
/// replaces the whole record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionRecord {
    session_id: SessionId,
    player_cards: Vec<String>,
    dealer_cards: Vec<String>,
    player_value: u32,
    dealer_value: Option<u32>,
    can_hit: bool,
    can_stand: bool,
    game_over: bool,
    outcome: Option<Outcome>,
    balance: Chips,
    cards_remaining: u32,
}

impl SessionRecord {
    /// Accept a server response.
    ///
    /// `expected` is the session the caller is operating on; pass `None`
    /// right after start or resume, where the server assigns the id.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProtocolViolation`] found: a null body, a missing
    /// id or card collection, a broken game-over invariant, or a session id
    /// other than `expected`.
    pub fn from_snapshot(
        snapshot: Option<SessionSnapshot>,
        expected: Option<SessionId>,
    ) -> Result<Self, ProtocolViolation> {
        let snapshot = snapshot.ok_or(ProtocolViolation::MissingRecord)?;
        let session_id = snapshot
            .session_id
            .ok_or(ProtocolViolation::MissingSessionId)?;
        let player_cards = snapshot
            .player_cards
            .ok_or(ProtocolViolation::MissingPlayerCards)?;
        let dealer_cards = snapshot
            .dealer_cards
            .ok_or(ProtocolViolation::MissingDealerCards)?;

        if snapshot.game_over && (snapshot.can_hit || snapshot.can_stand) {
            return Err(ProtocolViolation::ActionsAfterGameOver);
        }
        if !snapshot.game_over && snapshot.outcome.is_some() {
            return Err(ProtocolViolation::OutcomeBeforeGameOver);
        }
        if let Some(expected) = expected {
            if expected != session_id {
                return Err(ProtocolViolation::SessionMismatch {
                    expected,
                    actual: session_id,
                });
            }
        }

        Ok(Self {
            session_id,
            player_cards,
            dealer_cards,
            player_value: snapshot.player_value,
            dealer_value: snapshot.dealer_value,
            can_hit: snapshot.can_hit,
            can_stand: snapshot.can_stand,
            game_over: snapshot.game_over,
            outcome: snapshot.outcome,
            balance: snapshot.balance,
            cards_remaining: snapshot.cards_remaining,
        })
    }

    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn player_cards(&self) -> &[String] {
        &self.player_cards
    }

    #[must_use]
    pub fn dealer_cards(&self) -> &[String] {
        &self.dealer_cards
    }

    /// Dealer cards the player is allowed to see.
    ///
    /// Only the up card while the round is open and the dealer value is
    /// hidden; everything once it's revealed.
    #[must_use]
    pub fn visible_dealer_cards(&self) -> &[String] {
        if self.game_over || self.dealer_value.is_some() {
            &self.dealer_cards
        } else {
            let up = self.dealer_cards.len().min(1);
            &self.dealer_cards[..up]
        }
    }

    #[must_use]
    pub const fn player_value(&self) -> u32 {
        self.player_value
    }

    /// `None` while the hole card is hidden.
    #[must_use]
    pub const fn dealer_value(&self) -> Option<u32> {
        self.dealer_value
    }

    #[must_use]
    pub const fn can_hit(&self) -> bool {
        self.can_hit
    }

    #[must_use]
    pub const fn can_stand(&self) -> bool {
        self.can_stand
    }

    #[must_use]
    pub const fn game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub const fn balance(&self) -> Chips {
        self.balance
    }

    #[must_use]
    pub const fn cards_remaining(&self) -> u32 {
        self.cards_remaining
    }
}

/// Entry of the server's session listing.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: SessionId,
    #[serde(default)]
    pub balance: Chips,
}

impl SessionSummary {
    /// Selection label, e.g. `3f2a9c1d… | Balance: 250`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}… | Balance: {}", self.session_id.short(), self.balance)
    }
}
