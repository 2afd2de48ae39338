//! Wire types for the chat backend.

use serde::{Deserialize, Serialize};

use crate::conversation::{Conversation, Message};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
    pub conversation_name: Option<String>,
    pub subject: Option<String>,
}

/// Successful `POST /chat` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

/// One element of `GET /conversations`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConversationSummary {
    pub conversation_id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub conversation_name: Option<String>,
}

impl From<ConversationSummary> for Conversation {
    fn from(summary: ConversationSummary) -> Self {
        Conversation {
            id: summary.conversation_id,
            subject: summary.subject,
            name: summary.conversation_name,
        }
    }
}

/// Body shared by endpoints that only take a conversation id.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ConversationRef<'a> {
    pub conversation_id: &'a str,
}

/// Body of `POST /rename_conversation`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RenameRequest<'a> {
    pub conversation_id: &'a str,
    pub new_name: &'a str,
}

/// Body of `POST /search`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub search_term: &'a str,
}

/// Form body of `POST /login` and `POST /register`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// One user/bot pair of a stored conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Exchange {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot: Option<String>,
}

/// Successful `POST /load_conversation` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoadedConversation {
    pub messages: Vec<Exchange>,
    #[serde(default)]
    pub subject: Option<String>,
}

impl LoadedConversation {
    /// Flattens exchanges into transcript order (user before bot).
    pub fn transcript(&self) -> Vec<Message> {
        let mut out = Vec::with_capacity(self.messages.len() * 2);
        for exchange in &self.messages {
            if let Some(user) = exchange.user.as_deref().filter(|t| !t.is_empty()) {
                out.push(Message::user(user));
            }
            if let Some(bot) = exchange.bot.as_deref().filter(|t| !t.is_empty()) {
                out.push(Message::bot(bot));
            }
        }
        out
    }
}

/// Acknowledgement returned by delete, rename, login and register.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ack {
    pub message: String,
}

/// One element of `POST /search`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub bot: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub conversation_id: String,
}

impl SearchHit {
    /// Subject for display, `N/A` when missing.
    pub fn subject_or_na(&self) -> &str {
        self.subject
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("N/A")
    }
}

/// Result of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub message: String,
    /// `name=value` pairs from `Set-Cookie`, joined for a `Cookie` header.
    pub cookie: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;

    #[test]
    fn test_chat_request_serializes_nulls() {
        let req = ChatRequest {
            message: "Hello".into(),
            conversation_id: None,
            conversation_name: None,
            subject: Some("Greetings".into()),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Hello",
                "conversation_id": null,
                "conversation_name": null,
                "subject": "Greetings"
            })
        );
    }

    #[test]
    fn test_loaded_conversation_transcript_order() {
        let loaded: LoadedConversation = serde_json::from_value(serde_json::json!({
            "messages": [
                {"user": "Hi", "bot": "Hello!"},
                {"user": "Only user"},
                {"bot": "Only bot"}
            ],
            "subject": "Greeting"
        }))
        .unwrap();

        let roles: Vec<Role> = loaded.transcript().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Bot, Role::User, Role::Bot]);
        assert_eq!(loaded.transcript()[2].text, "Only user");
        assert_eq!(loaded.subject.as_deref(), Some("Greeting"));
    }

    #[test]
    fn test_summary_into_conversation() {
        let summary: ConversationSummary = serde_json::from_value(serde_json::json!({
            "conversation_id": "abc123",
            "subject": null,
            "conversation_name": "Named"
        }))
        .unwrap();
        let conversation = Conversation::from(summary);
        assert_eq!(conversation.display_label(), "Named");
    }

    #[test]
    fn test_search_hit_subject_fallback() {
        let hit: SearchHit = serde_json::from_value(serde_json::json!({
            "user": "q",
            "bot": "a",
            "conversation_id": "c1"
        }))
        .unwrap();
        assert_eq!(hit.subject_or_na(), "N/A");
    }
}
