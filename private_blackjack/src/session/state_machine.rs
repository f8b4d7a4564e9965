//! Session lifecycle state machine.
//!
//! Holds the current session and its latest server record, enforces the legal
//! transitions between phases and decides, after every server response,
//! whether to move on, keep the previous state or recover by starting over.
//!
//! ```text
//! NoSession -> AwaitingBet -> PlayerTurn -> RoundResolved -> AwaitingBet | NoSession
//! ```
//!
//! Reconnecting is allowed from any phase and lands in `AwaitingBet`.

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    errors::{RemoteError, SessionError},
    models::{SessionId, SessionRecord, SessionSnapshot, SessionSummary},
    rules::BetRules,
    store::{Operation, SessionStore},
};

/// Phase of the session lifecycle
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Phase {
    NoSession,
    AwaitingBet,
    PlayerTurn,
    RoundResolved,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NoSession => "no session is active",
            Self::AwaitingBet => "awaiting a bet",
            Self::PlayerTurn => "it's the player's turn",
            Self::RoundResolved => "the round is over",
        };
        write!(f, "{repr}")
    }
}

/// Player triggers that require a particular phase
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Action {
    PlaceBet,
    Hit,
    Stand,
    PlayAgain,
    Stop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PlaceBet => "place a bet",
            Self::Hit => "hit",
            Self::Stand => "stand",
            Self::PlayAgain => "play again",
            Self::Stop => "stop",
        };
        write!(f, "{repr}")
    }
}

/// Current state. Every phase with a session carries its record, so there
/// is never an id without a record or the other way around.
#[derive(Clone, Debug, Default)]
enum SessionState {
    #[default]
    NoSession,
    AwaitingBet(SessionRecord),
    PlayerTurn(SessionRecord),
    RoundResolved(SessionRecord),
}

impl SessionState {
    const fn phase(&self) -> Phase {
        match self {
            Self::NoSession => Phase::NoSession,
            Self::AwaitingBet(_) => Phase::AwaitingBet,
            Self::PlayerTurn(_) => Phase::PlayerTurn,
            Self::RoundResolved(_) => Phase::RoundResolved,
        }
    }

    const fn record(&self) -> Option<&SessionRecord> {
        match self {
            Self::NoSession => None,
            Self::AwaitingBet(record) | Self::PlayerTurn(record) | Self::RoundResolved(record) => {
                Some(record)
            }
        }
    }
}

/// Drives one player's session against a [`SessionStore`].
///
/// Every transition takes `&mut self`, so at most one server call is in
/// flight per machine. After any transition the machine is either in the
/// state the server just described, in its previous valid state, or in
/// `NoSession`; never half-updated.
#[derive(Debug)]
pub struct SessionMachine<S> {
    store: S,
    rules: BetRules,
    state: SessionState,
}

impl<S: SessionStore> SessionMachine<S> {
    #[must_use]
    pub fn new(store: S, rules: BetRules) -> Self {
        Self {
            store,
            rules,
            state: SessionState::NoSession,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Latest accepted server record, if a session is active.
    #[must_use]
    pub const fn record(&self) -> Option<&SessionRecord> {
        self.state.record()
    }

    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.record().map(SessionRecord::session_id)
    }

    #[must_use]
    pub const fn rules(&self) -> &BetRules {
        &self.rules
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Start a fresh session, dropping whatever was active.
    ///
    /// # Errors
    ///
    /// Fails if the server can't create a session or answers with an invalid
    /// record; the machine then stays in `NoSession`.
    pub async fn start_game(&mut self) -> Result<Phase, SessionError> {
        self.state = SessionState::NoSession;

        let response = self.store.start_session().await;
        let record = accept(Operation::StartSession, response, None)?;
        info!(
            "Started session {} with balance {}",
            record.session_id(),
            record.balance()
        );
        self.state = SessionState::AwaitingBet(record);
        Ok(self.phase())
    }

    /// Validate `raw` and place it as the bet for the current round.
    ///
    /// # Errors
    ///
    /// Invalid bets are rejected without contacting the server and leave the
    /// state untouched. Any server failure resets the session and starts a new
    /// one.
    pub async fn place_bet(&mut self, raw: &str) -> Result<Phase, SessionError> {
        let session = match &self.state {
            SessionState::AwaitingBet(record) => record.session_id(),
            other => {
                return Err(SessionError::IllegalTransition {
                    phase: other.phase(),
                    action: Action::PlaceBet,
                });
            }
        };
        let amount = self.rules.validate(raw)?;
        debug!("Placing bet of {amount} on session {session}");

        let response = self.store.place_bet(session, amount).await;
        match accept(Operation::PlaceBet, response, Some(session)) {
            Ok(record) => {
                self.state = if record.game_over() {
                    SessionState::RoundResolved(record)
                } else {
                    SessionState::PlayerTurn(record)
                };
                Ok(self.phase())
            }
            Err(err) => Err(self.recover(err).await),
        }
    }

    /// Draw another card.
    ///
    /// # Errors
    ///
    /// Rejected locally outside the player's turn or when the record doesn't
    /// offer a hit. A transport failure keeps the current state so the hit can
    /// be retried; any other failure resets and starts a new session.
    pub async fn hit(&mut self) -> Result<Phase, SessionError> {
        let session = self.turn_session(Action::Hit)?;

        let response = self.store.hit(session).await;
        match accept(Operation::Hit, response, Some(session)) {
            Ok(record) => {
                let resolved = record.game_over() || (!record.can_hit() && !record.can_stand());
                self.state = if resolved {
                    SessionState::RoundResolved(record)
                } else {
                    SessionState::PlayerTurn(record)
                };
                Ok(self.phase())
            }
            Err(err) => Err(self.recover_unless_transport(err).await),
        }
    }

    /// End the player's turn. Always resolves the round.
    ///
    /// # Errors
    ///
    /// Same policy as [`SessionMachine::hit`].
    pub async fn stand(&mut self) -> Result<Phase, SessionError> {
        let session = self.turn_session(Action::Stand)?;

        let response = self.store.stand(session).await;
        match accept(Operation::Stand, response, Some(session)) {
            Ok(record) => {
                if !record.game_over() {
                    warn!("Server did not close the round on stand for session {session}");
                }
                self.state = SessionState::RoundResolved(record);
                Ok(self.phase())
            }
            Err(err) => Err(self.recover_unless_transport(err).await),
        }
    }

    /// Close out the resolved round and reopen betting under the same session.
    ///
    /// Finishing is best effort: a failure is logged and the resume is tried
    /// anyway, since the server may already consider the round closed.
    ///
    /// # Errors
    ///
    /// If only the resume fails the resolved round is kept so the call can be
    /// retried. If both fail, or the resume reply is invalid, the session is
    /// reset and a new one is started.
    pub async fn play_again(&mut self) -> Result<Phase, SessionError> {
        let session = match &self.state {
            SessionState::RoundResolved(record) => record.session_id(),
            other => {
                return Err(SessionError::IllegalTransition {
                    phase: other.phase(),
                    action: Action::PlayAgain,
                });
            }
        };

        let finished = match self.store.finish_game(session).await {
            Ok(()) => true,
            Err(err) => {
                warn!("Could not finish round for session {session}, resuming anyway: {err}");
                false
            }
        };

        let response = self.store.resume_session(session).await;
        match accept(Operation::ResumeSession, response, Some(session)) {
            Ok(record) => {
                info!("Started a new round in session {}", record.session_id());
                self.state = SessionState::AwaitingBet(record);
                Ok(self.phase())
            }
            Err(err) if finished && !err.is_protocol() => {
                warn!("Could not resume session {session}, keeping the resolved round: {err}");
                Err(err)
            }
            Err(err) => Err(self.recover(err).await),
        }
    }

    /// Close out the resolved round and drop the session locally.
    ///
    /// # Errors
    ///
    /// Returns the finish failure, if any. Local state is cleared either way.
    pub async fn stop(&mut self) -> Result<(), SessionError> {
        let session = match &self.state {
            SessionState::RoundResolved(record) => record.session_id(),
            other => {
                return Err(SessionError::IllegalTransition {
                    phase: other.phase(),
                    action: Action::Stop,
                });
            }
        };

        let result = self.store.finish_game(session).await;
        self.state = SessionState::NoSession;
        result.map_err(|source| {
            warn!("Could not finish session {session}: {source}");
            SessionError::Remote {
                operation: Operation::FinishGame,
                source,
            }
        })
    }

    /// Sessions the server knows about. Never fails; a listing error is
    /// logged and reported as no sessions.
    pub async fn available_sessions(&self) -> Vec<SessionSummary> {
        match self.store.list_sessions().await {
            Ok(sessions) => sessions,
            Err(err) => {
                warn!("Could not list sessions: {err}");
                Vec::new()
            }
        }
    }

    /// Switch to `session`, replacing the current one.
    ///
    /// # Errors
    ///
    /// An unknown id or unreachable server keeps the current session. An
    /// invalid record, or one for another session, resets and starts a new
    /// session.
    pub async fn resume(&mut self, session: SessionId) -> Result<Phase, SessionError> {
        let response = self.store.resume_session(session).await;
        match accept(Operation::ResumeSession, response, Some(session)) {
            Ok(record) => {
                info!(
                    "Resumed session {} with balance {}",
                    record.session_id(),
                    record.balance()
                );
                self.state = SessionState::AwaitingBet(record);
                Ok(self.phase())
            }
            Err(err) if err.is_protocol() => Err(self.recover(err).await),
            Err(err) => {
                warn!("Could not resume session {session}: {err}");
                Err(err)
            }
        }
    }

    /// Forget the current session without telling the server.
    pub fn abandon(&mut self) {
        if let Some(session) = self.session_id() {
            debug!("Abandoning session {session}");
        }
        self.state = SessionState::NoSession;
    }

    fn turn_session(&self, action: Action) -> Result<SessionId, SessionError> {
        match &self.state {
            SessionState::PlayerTurn(record) => {
                let allowed = match action {
                    Action::Hit => record.can_hit(),
                    _ => record.can_stand(),
                };
                if allowed {
                    Ok(record.session_id())
                } else {
                    Err(SessionError::ActionNotAllowed(action))
                }
            }
            other => Err(SessionError::IllegalTransition {
                phase: other.phase(),
                action,
            }),
        }
    }

    async fn recover_unless_transport(&mut self, err: SessionError) -> SessionError {
        match &err {
            SessionError::Remote { source, .. } if source.is_transport() => {
                warn!("Keeping current state after transport failure: {err}");
                err
            }
            _ => self.recover(err).await,
        }
    }

    /// Drop local state and try once to start over with a new session.
    async fn recover(&mut self, err: SessionError) -> SessionError {
        warn!("Discarding session state after failure: {err}");
        self.state = SessionState::NoSession;
        if let Err(restart) = self.start_game().await {
            error!("Could not start a new session during recovery: {restart}");
        }
        err
    }
}

/// Apply the response validation rule to a server reply.
fn accept(
    operation: Operation,
    response: Result<Option<SessionSnapshot>, RemoteError>,
    expected: Option<SessionId>,
) -> Result<SessionRecord, SessionError> {
    let snapshot = response.map_err(|source| SessionError::Remote { operation, source })?;
    SessionRecord::from_snapshot(snapshot, expected)
        .map_err(|source| SessionError::Protocol { operation, source })
}
