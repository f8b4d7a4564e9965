//! Blackjack session lifecycle and server synchronization.
//!
//! This module implements:
//! - Validated session records received from the server
//! - Local bet validation (strict and lenient variants)
//! - The `SessionStore` contract a remote client implements
//! - The session state machine with its recovery policy
//! - A controller that turns player intents into transitions
//!
//! ## Example
//!
//! ```no_run
//! use private_blackjack::session::{BetRules, SessionMachine, SessionStore};
//!
//! async fn first_round<S: SessionStore>(store: S) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut machine = SessionMachine::new(store, BetRules::strict());
//!     machine.start_game().await?;
//!     machine.place_bet("50").await?;
//!     if let Some(record) = machine.record() {
//!         println!("Player has {}", record.player_value());
//!     }
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod errors;
pub mod models;
pub mod rules;
pub mod state_machine;
pub mod store;

pub use controller::{Intent, Presenter, SessionController};
pub use errors::{BetError, ProtocolViolation, RemoteError, SessionError};
pub use models::{Chips, Outcome, SessionId, SessionRecord, SessionSnapshot, SessionSummary};
pub use rules::{BetRules, DEFAULT_BET_UNIT, DEFAULT_MAX_BET};
pub use state_machine::{Action, Phase, SessionMachine};
pub use store::{Operation, SessionStore};
