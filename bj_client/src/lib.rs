//! Internal modules for the blackjack client.
//!
//! This library provides the HTTP session store, configuration, command
//! parsing and the console presenter used by the bj_client binary.

pub mod api_client;
pub mod commands;
pub mod config;
pub mod console;
pub mod logging;
