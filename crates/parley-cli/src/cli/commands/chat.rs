//! Chat command handler.

use anyhow::{Context, Result};
use parley_core::config::Config;
use parley_core::store::LocalStore;

pub async fn run(config: &Config, store: LocalStore) -> Result<()> {
    parley_tui::run_interactive_chat(config, store)
        .await
        .context("interactive chat failed")
}
