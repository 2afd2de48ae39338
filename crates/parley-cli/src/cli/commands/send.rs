//! Send command handler.
//!
//! Drives the same session state machine as the TUI for a single exchange.

use anyhow::{Context, Result};
use parley_core::api::ApiClient;
use parley_core::config::Config;
use parley_core::conversation::short_conversation_id;
use parley_core::session::{SendOutcome, SessionState};
use parley_core::store::LocalStore;

pub async fn run(
    config: &Config,
    store: &mut LocalStore,
    message: &str,
    new: bool,
    subject: Option<&str>,
) -> Result<()> {
    let client = ApiClient::from_config(config, store)?;

    let mut session = if new {
        store
            .set_conversation_id(None)
            .context("clear active conversation")?;
        SessionState::new()
    } else {
        SessionState::resume(store.conversation_id())
    };

    if subject.is_some() && !session.is_new() {
        tracing::warn!("--subject only applies to new conversations; ignoring");
    }

    let ticket = session.begin_send(message, subject)?;
    let result = client.chat(&ticket.to_request()).await;

    match session.complete_send(&ticket, result) {
        SendOutcome::Replied { reply, adopted } => {
            println!("{reply}");
            if let Some(id) = adopted {
                store
                    .set_conversation_id(Some(&id))
                    .context("persist conversation id")?;
                eprintln!("Started conversation {}", short_conversation_id(&id));
            }
            Ok(())
        }
        SendOutcome::Failed { message } => anyhow::bail!("Error: {message}"),
        SendOutcome::Stale => anyhow::bail!("Reply arrived for a superseded session"),
    }
}
