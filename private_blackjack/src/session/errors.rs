//! Session error types.

use thiserror::Error;

use super::{
    models::{Chips, SessionId},
    state_machine::{Action, Phase},
    store::Operation,
};

/// Local bet validation failures. Never sent to the server.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BetError {
    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("bet must be positive, got {0}")]
    NotPositive(Chips),

    #[error("bet {amount} is not a multiple of {unit}")]
    NotMultiple { amount: Chips, unit: Chips },

    #[error("bet {amount} exceeds the maximum of {max}")]
    AboveMaximum { amount: Chips, max: Chips },
}

/// Failures reported by a [`SessionStore`](super::store::SessionStore).
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RemoteError {
    /// Server unreachable, connection dropped or request timed out
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server doesn't know the session
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The server answered with an error status
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The server answered successfully but the body couldn't be decoded
    #[error("malformed response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// The request may never have reached the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// A response arrived but had the wrong shape.
    #[must_use]
    pub const fn is_malformed_response(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Structurally invalid server responses.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ProtocolViolation {
    #[error("server returned no session record")]
    MissingRecord,

    #[error("session record has no session id")]
    MissingSessionId,

    #[error("session record has no player cards")]
    MissingPlayerCards,

    #[error("session record has no dealer cards")]
    MissingDealerCards,

    #[error("round is still open but an outcome was reported")]
    OutcomeBeforeGameOver,

    #[error("round is over but actions are still offered")]
    ActionsAfterGameOver,

    #[error("expected session {expected}, server answered for {actual}")]
    SessionMismatch {
        expected: SessionId,
        actual: SessionId,
    },
}

/// Errors surfaced by the session state machine
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SessionError {
    #[error("invalid bet: {0}")]
    Validation(#[from] BetError),

    #[error("{operation} failed: {source}")]
    Remote {
        operation: Operation,
        source: RemoteError,
    },

    #[error("{operation} returned an invalid game state: {source}")]
    Protocol {
        operation: Operation,
        source: ProtocolViolation,
    },

    #[error("can't {action} while {phase}")]
    IllegalTransition { phase: Phase, action: Action },

    #[error("the server doesn't allow {0} right now")]
    ActionNotAllowed(Action),
}

impl SessionError {
    /// Validation errors are answered with a new prompt, not an error dialog.
    #[must_use]
    pub const fn needs_reprompt(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Triggers refused locally, before any server call.
    #[must_use]
    pub const fn is_illegal(&self) -> bool {
        matches!(
            self,
            Self::IllegalTransition { .. } | Self::ActionNotAllowed(_)
        )
    }

    /// Failures after which the local view can't be trusted any more.
    #[must_use]
    pub const fn is_protocol(&self) -> bool {
        match self {
            Self::Protocol { .. } => true,
            Self::Remote { source, .. } => source.is_malformed_response(),
            _ => false,
        }
    }

    /// Message suitable for showing to the player.
    ///
    /// Transport details are kept out; they go to the log instead.
    pub fn client_message(&self) -> String {
        match self {
            Self::Remote {
                source: RemoteError::Transport(_),
                ..
            } => "Could not reach the game server".to_string(),
            Self::Remote {
                source: RemoteError::NotFound(_),
                ..
            } => "Session not found on the server".to_string(),
            Self::Remote {
                source: RemoteError::Rejected { message, .. },
                ..
            } => {
                if message.trim().is_empty() {
                    "The server rejected the request".to_string()
                } else {
                    message.trim().to_string()
                }
            }
            Self::Remote {
                source: RemoteError::Decode(_),
                ..
            }
            | Self::Protocol { .. } => "Received invalid game state".to_string(),
            _ => self.to_string(),
        }
    }
}
