//! Full-screen chat TUI for Parley.

pub mod common;
pub mod dispatch;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr, stdout};

use anyhow::Result;
use parley_core::api::ApiClient;
use parley_core::config::Config;
use parley_core::conversation::short_conversation_id;
use parley_core::store::LocalStore;
pub use runtime::TuiRuntime;

use crate::state::{AppState, TuiState};

/// Runs the interactive chat loop.
pub async fn run_interactive_chat(config: &Config, store: LocalStore) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "Chat mode requires a terminal.\n\
             Use `parley send -m '...'` for non-interactive use."
        );
    }

    let client = ApiClient::from_config(config, &store)?;
    let server_label = client.base_url().to_string();
    let signed_in = store.is_signed_in();
    let resumed = store.conversation_id().map(String::from);

    let mut err = stderr();
    writeln!(err, "Parley")?;
    writeln!(err, "Server: {server_label}")?;
    if !signed_in {
        writeln!(err, "Not signed in. Run `parley login` to keep conversations.")?;
    }
    if let Some(id) = &resumed {
        writeln!(err, "Resuming conversation {}", short_conversation_id(id))?;
    }
    err.flush()?;

    tracing::info!(server = %server_label, signed_in, "starting chat session");

    let state = AppState::new(TuiState::new(
        config,
        server_label,
        signed_in,
        resumed.as_deref(),
    ));
    let mut runtime = TuiRuntime::new(state, client, store)?;
    let result = runtime.run();
    drop(runtime);
    result?;

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
