//! Intent dispatch between a presentation layer and the state machine.

use log::debug;

use super::{
    errors::SessionError,
    models::{SessionId, SessionRecord, SessionSummary},
    rules::BetRules,
    state_machine::{Phase, SessionMachine},
    store::SessionStore,
};

/// Everything a player can ask for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Intent {
    StartNewGame,
    Reconnect,
    /// Raw bet input, validated before it goes anywhere.
    PlaceBet(String),
    Hit,
    Stand,
    PlayAgain,
    Stop,
}

/// Rendering and prompting, implemented by whatever UI drives the session.
pub trait Presenter {
    /// Render the current record, or an empty table for `None`.
    fn show(&mut self, record: Option<&SessionRecord>);

    fn show_error(&mut self, message: &str);

    fn show_info(&mut self, message: &str);

    /// Ask for a bet. `None` means the player cancelled.
    fn prompt_bet(&mut self, rules: &BetRules) -> Option<String>;

    /// Ask which session to resume. `None` means the player cancelled.
    fn prompt_session_choice(&mut self, sessions: &[SessionSummary]) -> Option<SessionId>;

    /// Ask whether to play another round after `record` resolved.
    fn confirm_play_again(&mut self, record: &SessionRecord) -> bool;
}

/// What the controller does after a transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Step {
    /// Wait for the next intent.
    Idle,
    CollectBet,
    FinishRound,
}

/// Owns the machine and the presenter and funnels every intent through
/// [`SessionController::dispatch`].
#[derive(Debug)]
pub struct SessionController<S, P> {
    machine: SessionMachine<S>,
    presenter: P,
}

impl<S: SessionStore, P: Presenter> SessionController<S, P> {
    #[must_use]
    pub fn new(store: S, rules: BetRules, presenter: P) -> Self {
        Self::with_machine(SessionMachine::new(store, rules), presenter)
    }

    /// Drive a machine that may already hold a session.
    #[must_use]
    pub const fn with_machine(machine: SessionMachine<S>, presenter: P) -> Self {
        Self { machine, presenter }
    }

    #[must_use]
    pub const fn machine(&self) -> &SessionMachine<S> {
        &self.machine
    }

    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Handle one intent, including any prompts it leads to (bets, the
    /// round-end question, session selection).
    pub async fn dispatch(&mut self, intent: Intent) {
        debug!("Dispatching {intent:?} in phase {:?}", self.machine.phase());
        let mut next = match intent {
            Intent::StartNewGame => self.start_new_game().await,
            Intent::Reconnect => self.reconnect().await,
            Intent::PlaceBet(raw) => self.submit_bet(&raw).await,
            Intent::Hit => {
                let previous = self.machine.session_id();
                let result = self.machine.hit().await;
                self.after_turn("Hit failed", result, previous)
            }
            Intent::Stand => {
                let previous = self.machine.session_id();
                let result = self.machine.stand().await;
                self.after_turn("Stand failed", result, previous)
            }
            Intent::PlayAgain => self.play_again().await,
            Intent::Stop => self.stop().await,
        };

        loop {
            next = match next {
                Step::Idle => return,
                Step::CollectBet => self.collect_bet().await,
                Step::FinishRound => self.finish_round().await,
            };
        }
    }

    async fn start_new_game(&mut self) -> Step {
        match self.machine.start_game().await {
            Ok(_) => {
                self.render();
                Step::CollectBet
            }
            Err(err) => {
                self.presenter
                    .show_error(&format!("Error starting new game: {}", err.client_message()));
                self.render();
                Step::Idle
            }
        }
    }

    /// Prompt for bets until one is placed, the player cancels, or there's no
    /// session left to bet on.
    async fn collect_bet(&mut self) -> Step {
        while self.machine.phase() == Phase::AwaitingBet {
            let Some(raw) = self.presenter.prompt_bet(self.machine.rules()) else {
                self.machine.abandon();
                self.render();
                return Step::Idle;
            };
            match self.submit_bet(&raw).await {
                Step::CollectBet => {}
                other => return other,
            }
        }
        Step::Idle
    }

    async fn submit_bet(&mut self, raw: &str) -> Step {
        let previous = self.machine.session_id();
        match self.machine.place_bet(raw).await {
            Ok(Phase::RoundResolved) => {
                self.render();
                Step::FinishRound
            }
            Ok(_) => {
                self.render();
                Step::Idle
            }
            Err(err) if err.needs_reprompt() => {
                let requirement = self.machine.rules().requirement();
                self.presenter.show_error(&requirement);
                Step::CollectBet
            }
            Err(err) => {
                self.report("Error placing bet", &err, previous);
                Step::CollectBet
            }
        }
    }

    fn after_turn(
        &mut self,
        context: &str,
        result: Result<Phase, SessionError>,
        previous: Option<SessionId>,
    ) -> Step {
        match result {
            Ok(Phase::RoundResolved) => {
                self.render();
                Step::FinishRound
            }
            Ok(_) => {
                self.render();
                Step::Idle
            }
            Err(err) => {
                self.report(context, &err, previous);
                if err.is_illegal() {
                    Step::Idle
                } else {
                    Step::CollectBet
                }
            }
        }
    }

    /// Show the round result and ask whether to go again.
    async fn finish_round(&mut self) -> Step {
        let Some(record) = self.machine.record().cloned() else {
            return Step::Idle;
        };
        let outcome = record
            .outcome()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        self.presenter.show_info(&format!(
            "Cards remaining: {} Outcome: {} Balance: {} units",
            record.cards_remaining(),
            outcome,
            record.balance()
        ));

        if self.presenter.confirm_play_again(&record) {
            self.play_again().await
        } else {
            self.stop().await
        }
    }

    async fn play_again(&mut self) -> Step {
        let previous = self.machine.session_id();
        match self.machine.play_again().await {
            Ok(_) => self.render(),
            Err(err) => self.report("Failed to start new round", &err, previous),
        }
        Step::CollectBet
    }

    async fn stop(&mut self) -> Step {
        if let Err(err) = self.machine.stop().await {
            if err.is_illegal() {
                self.presenter.show_error(&err.client_message());
                return Step::Idle;
            }
            self.presenter
                .show_error(&format!("Cannot save: {}", err.client_message()));
        }
        self.render();
        Step::Idle
    }

    async fn reconnect(&mut self) -> Step {
        let sessions = self.machine.available_sessions().await;
        if sessions.is_empty() {
            self.presenter.show_info("No saved sessions found");
            return Step::Idle;
        }
        let Some(session) = self.presenter.prompt_session_choice(&sessions) else {
            return Step::Idle;
        };

        let previous = self.machine.session_id();
        match self.machine.resume(session).await {
            Ok(_) => self.render(),
            Err(err) => self.report("Resume error", &err, previous),
        }
        Step::CollectBet
    }

    /// Surface a failure and say where it left the session.
    fn report(&mut self, context: &str, err: &SessionError, previous: Option<SessionId>) {
        self.presenter
            .show_error(&format!("{context}: {}", err.client_message()));
        if err.is_illegal() {
            return;
        }
        match self.machine.phase() {
            Phase::NoSession => self.presenter.show_info("No active session."),
            _ if self.machine.session_id() != previous => {
                self.presenter.show_info("Starting a new game.");
            }
            _ => {}
        }
        self.render();
    }

    fn render(&mut self) {
        self.presenter.show(self.machine.record());
    }
}
