//! # Private Blackjack
//!
//! Client-side core of an online, server-authoritative blackjack game.
//!
//! The server owns the deck, the dealer and the payouts. This library keeps
//! the client's view of one session in step with it: every server response
//! replaces the local record wholesale, responses that don't hold together are
//! thrown away, and failures send the session back to a well defined state
//! instead of leaving it half updated.
//!
//! ## Architecture
//!
//! A session moves through four phases:
//!
//! - **NoSession**: nothing active (initial state)
//! - **AwaitingBet**: a session is open and waiting for the next bet
//! - **PlayerTurn**: cards are dealt and the player can hit or stand
//! - **RoundResolved**: the server settled the round
//!
//! ## Core Modules
//!
//! - [`session`]: records, bet rules, the store contract, the state machine
//!   and the intent controller
//!
//! ## Example
//!
//! ```
//! use private_blackjack::BetRules;
//!
//! let rules = BetRules::strict();
//! assert_eq!(rules.validate("50"), Ok(50));
//! assert!(rules.validate("1010").is_err());
//! assert_eq!(BetRules::lenient().validate("1010"), Ok(1010));
//! ```

/// Session lifecycle, synchronization protocol and recovery.
pub mod session;
pub use session::{
    BetError, BetRules, Chips, Intent, Outcome, Phase, Presenter, RemoteError, SessionController,
    SessionError, SessionId, SessionMachine, SessionRecord, SessionSnapshot, SessionStore,
    SessionSummary,
};
