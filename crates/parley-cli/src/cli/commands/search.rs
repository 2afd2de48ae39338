//! Search command handler.

use anyhow::{Context, Result};
use parley_core::api::ApiClient;
use parley_core::config::Config;
use parley_core::store::LocalStore;

pub async fn run(config: &Config, store: &LocalStore, term: &str) -> Result<()> {
    let client = ApiClient::from_config(config, store)?;
    let hits = client
        .search(term)
        .await
        .with_context(|| format!("search for '{}'", term.trim()))?;

    if hits.is_empty() {
        println!("No results found.");
        return Ok(());
    }
    for hit in hits {
        println!("{}  {}", hit.subject_or_na(), hit.conversation_id);
        println!("  You: {}", hit.user);
        println!("  Bot: {}", hit.bot);
    }
    Ok(())
}
