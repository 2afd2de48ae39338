//! Core library for the Parley chat client.
//!
//! Everything except the terminal UI lives here: configuration, logging,
//! the durable client store, the REST client and the session state machine.

pub mod api;
pub mod config;
pub mod conversation;
pub mod logging;
pub mod session;
pub mod store;
