//! REST surface of the chat backend.

mod client;
mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
