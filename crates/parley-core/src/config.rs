//! Configuration management for Parley.
//!
//! Loads configuration from ${PARLEY_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `server_url`.
pub const SERVER_URL_ENV: &str = "PARLEY_SERVER_URL";

/// Environment variable that overrides `log_filter`.
pub const LOG_FILTER_ENV: &str = "PARLEY_LOG";

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges a user's config into the latest template.
///
/// The template provides structure and comments; user values win.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;
    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    for (key, value) in user_doc.as_table().iter() {
        if let toml_edit::Item::Value(v) = value {
            doc[key] = toml_edit::Item::Value(v.clone());
        }
    }

    Ok(doc.to_string())
}

pub mod paths {
    //! Path resolution for Parley configuration and data files.
    //!
    //! PARLEY_HOME resolution order:
    //! 1. PARLEY_HOME environment variable (if set)
    //! 2. ~/.config/parley (default)

    use std::path::PathBuf;

    /// Returns the Parley home directory.
    ///
    /// Falls back to a relative `.parley` directory when no home directory
    /// can be determined.
    pub fn parley_home() -> PathBuf {
        if let Ok(home) = std::env::var("PARLEY_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".parley"),
            |h| h.join(".config").join("parley"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        parley_home().join("config.toml")
    }

    /// Returns the path to the durable client state file.
    pub fn state_path() -> PathBuf {
        parley_home().join("state.json")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        parley_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the chat backend.
    pub server_url: String,

    /// Per-request timeout in seconds (0 disables).
    pub request_timeout_secs: u64,

    /// Whether the conversation sidebar starts visible.
    pub show_sidebar: bool,

    /// Tracing filter directive.
    pub log_filter: String,
}

impl Config {
    const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_LOG_FILTER: &str = "info";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the effective server URL.
    ///
    /// Resolution order:
    /// 1. `PARLEY_SERVER_URL` env var (if set and non-empty)
    /// 2. `server_url` from config (if non-empty)
    /// 3. Default: `http://127.0.0.1:5000`
    pub fn effective_server_url(&self) -> Result<url::Url> {
        let env_url = std::env::var(SERVER_URL_ENV).ok();
        resolve_server_url(env_url.as_deref(), &self.server_url)
    }

    /// Returns the effective tracing filter (`PARLEY_LOG` wins).
    pub fn effective_log_filter(&self) -> String {
        std::env::var(LOG_FILTER_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.log_filter.clone())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Saves only the `server_url` field to the config file.
    pub fn save_server_url(server_url: &str) -> Result<()> {
        Self::save_server_url_to(&paths::config_path(), server_url)
    }

    /// Saves only the `server_url` field to a specific config file path.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// If file exists, merges user values into the latest template.
    pub fn save_server_url_to(path: &Path, server_url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let parsed = url::Url::parse(server_url.trim())
            .with_context(|| format!("Invalid server URL: {server_url}"))?;

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        doc["server_url"] = value(parsed.as_str().trim_end_matches('/'));

        Self::write_config(path, &doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: Self::DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            show_sidebar: true,
            log_filter: Self::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn resolve_server_url(env_url: Option<&str>, config_url: &str) -> Result<url::Url> {
    let chosen = env_url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .or_else(|| Some(config_url.trim()).filter(|u| !u.is_empty()))
        .unwrap_or(Config::DEFAULT_SERVER_URL);

    url::Url::parse(chosen).with_context(|| format!("Invalid server URL: {chosen}"))
}
