//! Contract between the state machine and the remote session store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    errors::RemoteError,
    models::{Chips, SessionId, SessionSnapshot, SessionSummary},
};

/// Remote operations, used for error reporting and logging.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Operation {
    StartSession,
    ListSessions,
    ResumeSession,
    PlaceBet,
    Hit,
    Stand,
    FinishGame,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::StartSession => "start session",
            Self::ListSessions => "list sessions",
            Self::ResumeSession => "resume session",
            Self::PlaceBet => "place bet",
            Self::Hit => "hit",
            Self::Stand => "stand",
            Self::FinishGame => "finish game",
        };
        write!(f, "{repr}")
    }
}

/// Server-side session store.
///
/// Record-returning calls hand back the raw snapshot; `Ok(None)` means the
/// server answered with an empty (`null`) body. Callers never issue two
/// calls for the same session at once.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session with zero balance and no cards.
    async fn start_session(&self) -> Result<Option<SessionSnapshot>, RemoteError>;

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, RemoteError>;

    /// Fails with [`RemoteError::NotFound`] for unknown ids.
    async fn resume_session(
        &self,
        session: SessionId,
    ) -> Result<Option<SessionSnapshot>, RemoteError>;

    async fn place_bet(
        &self,
        session: SessionId,
        amount: Chips,
    ) -> Result<Option<SessionSnapshot>, RemoteError>;

    async fn hit(&self, session: SessionId) -> Result<Option<SessionSnapshot>, RemoteError>;

    async fn stand(&self, session: SessionId) -> Result<Option<SessionSnapshot>, RemoteError>;

    /// Close out the current round. Finishing twice is harmless.
    async fn finish_game(&self, session: SessionId) -> Result<(), RemoteError>;
}
