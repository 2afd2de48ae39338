//! Durable client-local key/value store.
//!
//! A small JSON object persisted at `${PARLEY_HOME}/state.json`. It holds the
//! active conversation id (so a restart resumes the same conversation) and
//! the backend session cookie.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::paths;

/// Key under which the active conversation id is stored.
pub const CONVERSATION_ID_KEY: &str = "conversationId";

/// Key under which the backend session cookie is stored.
pub const SESSION_KEY: &str = "session";

/// File-backed string map. Every mutation is written through immediately.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Opens the store at the default path.
    pub fn open() -> Result<Self> {
        Self::open_at(paths::state_path())
    }

    /// Opens the store at a specific path.
    ///
    /// A missing or empty file yields an empty store.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read state from {}", path.display()))?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse state from {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    /// Removes a key. Writing is skipped when the key was absent.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.get(CONVERSATION_ID_KEY)
    }

    /// Mirrors the active conversation id; `None` clears the key.
    pub fn set_conversation_id(&mut self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) => self.set(CONVERSATION_ID_KEY, id),
            None => self.remove(CONVERSATION_ID_KEY),
        }
    }

    pub fn session_cookie(&self) -> Option<&str> {
        self.get(SESSION_KEY)
    }

    pub fn set_session_cookie(&mut self, cookie: Option<&str>) -> Result<()> {
        match cookie {
            Some(cookie) => self.set(SESSION_KEY, cookie),
            None => self.remove(SESSION_KEY),
        }
    }

    /// Whether a backend session cookie is present.
    pub fn is_signed_in(&self) -> bool {
        self.session_cookie().is_some_and(|c| !c.is_empty())
    }

    /// Writes the store atomically (temp file + rename).
    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.entries).context("serialize state")?;
        let tmp_path = self.path.with_extension("json.tmp");

        // Holds the session cookie, so keep it private to the user.
        #[cfg(unix)]
        {
            use std::fs::OpenOptions;
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;

            // A leftover temp file would keep its old mode.
            let _ = fs::remove_file(&tmp_path);
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&tmp_path)
                .with_context(|| format!("Failed to open {} for writing", tmp_path.display()))?;
            file.write_all(json.as_bytes())
                .with_context(|| format!("Failed to write state to {}", tmp_path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&tmp_path, json)
                .with_context(|| format!("Failed to write state to {}", tmp_path.display()))?;
        }

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}
