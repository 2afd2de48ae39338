//! Authentication command handlers.

use anyhow::{Context, Result};
use parley_core::api::ApiClient;
use parley_core::api::types::AuthSession;
use parley_core::config::Config;
use parley_core::store::LocalStore;

pub async fn login(
    config: &Config,
    store: &mut LocalStore,
    username: &str,
    password: &str,
) -> Result<()> {
    let client = ApiClient::from_config(config, store)?;
    let session = client.login(username, password).await.context("login")?;
    finish(store, session)
}

pub async fn register(
    config: &Config,
    store: &mut LocalStore,
    username: &str,
    password: &str,
) -> Result<()> {
    let client = ApiClient::from_config(config, store)?;
    let session = client
        .register(username, password)
        .await
        .context("register")?;
    finish(store, session)
}

fn finish(store: &mut LocalStore, session: AuthSession) -> Result<()> {
    match session.cookie.as_deref() {
        Some(cookie) => store
            .set_session_cookie(Some(cookie))
            .context("store session cookie")?,
        None => tracing::warn!("server did not set a session cookie"),
    }
    println!("{}", session.message);
    Ok(())
}

/// Clears the local session. The server is not contacted.
pub fn logout(store: &mut LocalStore) -> Result<()> {
    store
        .set_session_cookie(None)
        .context("clear session cookie")?;
    store
        .set_conversation_id(None)
        .context("clear active conversation")?;
    println!("Logged out.");
    Ok(())
}
