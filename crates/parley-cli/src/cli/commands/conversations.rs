//! Conversation command handlers.

use anyhow::{Context, Result};
use parley_core::api::ApiClient;
use parley_core::config::Config;
use parley_core::conversation::resolve_label;
use parley_core::store::LocalStore;

pub async fn list(config: &Config, store: &LocalStore) -> Result<()> {
    let client = ApiClient::from_config(config, store)?;
    let conversations = client.conversations().await.context("list conversations")?;
    if conversations.is_empty() {
        println!("No conversations found.");
        return Ok(());
    }

    let active = store.conversation_id();
    for conversation in conversations {
        let marker = if active == Some(conversation.id.as_str()) {
            '*'
        } else {
            ' '
        };
        println!(
            "{marker} {}  {}",
            conversation.display_label(),
            conversation.id
        );
    }
    Ok(())
}

pub async fn show(config: &Config, store: &LocalStore, id: &str) -> Result<()> {
    let client = ApiClient::from_config(config, store)?;
    let loaded = client
        .load_conversation(id)
        .await
        .with_context(|| format!("load conversation '{id}'"))?;

    println!("# {}", resolve_label(loaded.subject.as_deref(), None, id));
    let transcript = loaded.transcript();
    if transcript.is_empty() {
        println!("(no messages)");
    }
    for message in transcript {
        println!("{}: {}", message.role, message.text);
    }
    Ok(())
}

pub async fn rename(config: &Config, store: &LocalStore, id: &str, name: &str) -> Result<()> {
    let client = ApiClient::from_config(config, store)?;
    let message = client
        .rename_conversation(id, name)
        .await
        .with_context(|| format!("rename conversation '{id}'"))?;
    println!("{message}");
    Ok(())
}

/// Deletes a conversation. Deleting the active one also clears it locally.
pub async fn delete(config: &Config, store: &mut LocalStore, id: &str) -> Result<()> {
    let client = ApiClient::from_config(config, store)?;
    let message = client
        .delete_conversation(id)
        .await
        .with_context(|| format!("delete conversation '{id}'"))?;

    if store.conversation_id() == Some(id) {
        store
            .set_conversation_id(None)
            .context("clear active conversation")?;
    }
    println!("{message}");
    Ok(())
}
