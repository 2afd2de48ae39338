//! CLI command handlers.

pub mod auth;
pub mod chat;
pub mod config;
pub mod conversations;
pub mod search;
pub mod send;
