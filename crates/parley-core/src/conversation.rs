//! Conversation and message model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of id characters shown in fallback labels.
const SHORT_ID_CHARS: usize = 8;

/// A server-persisted conversation as listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub subject: Option<String>,
    pub name: Option<String>,
}

impl Conversation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: None,
            name: None,
        }
    }

    /// Display label: subject, else name, else `Conversation <short id>`.
    pub fn display_label(&self) -> String {
        resolve_label(self.subject.as_deref(), self.name.as_deref(), &self.id)
    }
}

/// Resolves a conversation label from its title fields.
///
/// Blank strings count as missing.
pub fn resolve_label(subject: Option<&str>, name: Option<&str>, id: &str) -> String {
    subject
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| name.map(str::trim).filter(|n| !n.is_empty()))
        .map_or_else(
            || format!("Conversation {}", short_conversation_id(id)),
            ToString::to_string,
        )
}

/// First eight characters of an id (char-safe).
pub fn short_conversation_id(id: &str) -> String {
    id.chars().take(SHORT_ID_CHARS).collect()
}

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
    Error,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
            Role::Error => "error",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Role::Error, text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.text)
    }
}
