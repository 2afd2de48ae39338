//! HTTP client for the chat backend.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::ApiError;
use super::types::{
    Ack, AuthSession, ChatReply, ChatRequest, ConversationRef, ConversationSummary, Credentials,
    LoadedConversation, RenameRequest, SearchHit, SearchRequest,
};
use crate::config::Config;
use crate::conversation::Conversation;
use crate::store::LocalStore;

/// Backend REST client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
    session_cookie: Option<String>,
}

impl ApiClient {
    /// Creates a client for `base`.
    ///
    /// The base path is treated as a directory, so `http://host/api` and
    /// `http://host/api/` resolve endpoints identically.
    pub fn new(
        mut base: Url,
        timeout: Option<Duration>,
        session_cookie: Option<String>,
    ) -> Result<Self> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build HTTP client")?;

        Ok(Self {
            base,
            http,
            session_cookie: session_cookie.filter(|c| !c.is_empty()),
        })
    }

    /// Creates a client from config and the stored session cookie.
    pub fn from_config(config: &Config, store: &LocalStore) -> Result<Self> {
        let base = config.effective_server_url()?;
        Self::new(
            base,
            config.request_timeout(),
            store.session_cookie().map(String::from),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn is_signed_in(&self) -> bool {
        self.session_cookie.is_some()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Network(format!("invalid endpoint {path}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(COOKIE, cookie);
        }
        Ok(builder)
    }

    /// Sends a chat message.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        if request.message.trim().is_empty() {
            return Err(ApiError::validation("message"));
        }
        tracing::debug!(
            conversation_id = request.conversation_id.as_deref().unwrap_or("<new>"),
            "POST /chat"
        );
        let response = self.request(Method::POST, "chat")?.json(request).send().await?;
        decode(response).await
    }

    /// Lists the signed-in user's conversations.
    pub async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let response = self.request(Method::GET, "conversations")?.send().await?;
        let summaries: Vec<ConversationSummary> = decode(response).await?;
        Ok(summaries.into_iter().map(Conversation::from).collect())
    }

    /// Loads the full transcript of one conversation.
    pub async fn load_conversation(&self, id: &str) -> Result<LoadedConversation, ApiError> {
        if id.trim().is_empty() {
            return Err(ApiError::validation("conversation_id"));
        }
        let response = self
            .request(Method::POST, "load_conversation")?
            .json(&ConversationRef {
                conversation_id: id,
            })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_conversation(&self, id: &str) -> Result<String, ApiError> {
        if id.trim().is_empty() {
            return Err(ApiError::validation("conversation_id"));
        }
        let response = self
            .request(Method::POST, "delete_conversation")?
            .json(&ConversationRef {
                conversation_id: id,
            })
            .send()
            .await?;
        let ack: Ack = decode(response).await?;
        Ok(ack.message)
    }

    pub async fn rename_conversation(&self, id: &str, new_name: &str) -> Result<String, ApiError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ApiError::validation("new_name"));
        }
        let response = self
            .request(Method::POST, "rename_conversation")?
            .json(&RenameRequest {
                conversation_id: id,
                new_name,
            })
            .send()
            .await?;
        let ack: Ack = decode(response).await?;
        Ok(ack.message)
    }

    pub async fn search(&self, term: &str) -> Result<Vec<SearchHit>, ApiError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ApiError::validation("search_term"));
        }
        let response = self
            .request(Method::POST, "search")?
            .json(&SearchRequest { search_term: term })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession, ApiError> {
        self.authenticate("login", username, password, "Login failed")
            .await
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<AuthSession, ApiError> {
        self.authenticate("register", username, password, "Unknown response")
            .await
    }

    async fn authenticate(
        &self,
        path: &str,
        username: &str,
        password: &str,
        fallback: &str,
    ) -> Result<AuthSession, ApiError> {
        if username.trim().is_empty() {
            return Err(ApiError::validation("username"));
        }
        if password.is_empty() {
            return Err(ApiError::validation("password"));
        }

        let response = self
            .request(Method::POST, path)?
            .form(&Credentials { username, password })
            .send()
            .await?;

        let cookie = session_cookie_from(response.headers());
        let status = response.status();
        let body = response.text().await?;

        if let Some(message) = error_message(&body) {
            return Err(ApiError::server(Some(status.as_u16()), message));
        }
        match serde_json::from_str::<Ack>(&body) {
            Ok(ack) if status.is_success() => Ok(AuthSession {
                message: ack.message,
                cookie,
            }),
            _ => Err(ApiError::server(Some(status.as_u16()), fallback)),
        }
    }
}

/// Decodes a JSON response, mapping `{error}` bodies and non-success
/// statuses to `ApiError::Server`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if let Some(message) = error_message(&body) {
        return Err(ApiError::server(Some(status.as_u16()), message));
    }
    if !status.is_success() {
        return Err(ApiError::server(
            Some(status.as_u16()),
            format!("HTTP {status}"),
        ));
    }

    serde_json::from_str(&body).map_err(|e| {
        ApiError::server(Some(status.as_u16()), format!("malformed response: {e}"))
    })
}

/// Extracts the `error` field of a JSON object body, if present.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Collects `name=value` pairs from every `Set-Cookie` header.
fn session_cookie_from(headers: &reqwest::header::HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .collect();

    (!pairs.is_empty()).then(|| pairs.join("; "))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer, cookie: Option<&str>) -> ApiClient {
        let base = Url::parse(&server.uri()).unwrap();
        ApiClient::new(base, Some(Duration::from_secs(5)), cookie.map(String::from)).unwrap()
    }

    fn chat_request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            conversation_id: None,
            conversation_name: None,
            subject: None,
        }
    }

    #[tokio::test]
    async fn test_chat_success_decodes_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({
                "message": "Hello",
                "conversation_id": null,
                "conversation_name": null,
                "subject": null
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reply": "Hi",
                "conversation_id": "abc123",
                "subject": "Greetings"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server, None)
            .chat(&chat_request("Hello"))
            .await
            .unwrap();
        assert_eq!(reply.reply, "Hi");
        assert_eq!(reply.conversation_id.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_chat_error_body_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "model down"})))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .chat(&chat_request("Hello"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::server(Some(500), "model down"));
    }

    #[tokio::test]
    async fn test_error_field_wins_even_with_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/load_conversation"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "not found"})))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .load_conversation("missing")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "not found");
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .chat(&chat_request("   "))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_conversations_sends_session_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/conversations"))
            .and(header("cookie", "session=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"conversation_id": "c1", "subject": "First", "conversation_name": null},
                {"conversation_id": "c2222222222", "subject": null, "conversation_name": null}
            ])))
            .mount(&server)
            .await;

        let conversations = client_for(&server, Some("session=abc"))
            .conversations()
            .await
            .unwrap();
        let labels: Vec<String> = conversations.iter().map(Conversation::display_label).collect();
        assert_eq!(labels, vec!["First", "Conversation c2222222"]);
    }

    #[tokio::test]
    async fn test_delete_non_success_status_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/delete_conversation"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .delete_conversation("c1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Server { status: Some(403), .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/load_conversation"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"user": "hi"}])))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .load_conversation("c1")
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("malformed response"));
    }

    #[tokio::test]
    async fn test_rename_trims_and_posts_new_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rename_conversation"))
            .and(body_json(json!({"conversation_id": "c1", "new_name": "Renamed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let message = client_for(&server, None)
            .rename_conversation("c1", "  Renamed ")
            .await
            .unwrap();
        assert_eq!(message, "ok");
    }

    #[tokio::test]
    async fn test_login_captures_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_string_contains("username=alice"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session=s3cr3t; HttpOnly; Path=/")
                    .set_body_json(json!({"message": "Logged in"})),
            )
            .mount(&server)
            .await;

        let session = client_for(&server, None)
            .login("alice", "pw")
            .await
            .unwrap();
        assert_eq!(session.message, "Logged in");
        assert_eq!(session.cookie.as_deref(), Some("session=s3cr3t"));
    }

    #[tokio::test]
    async fn test_login_without_message_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server, None)
            .login("alice", "pw")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let client = ApiClient::new(base, Some(Duration::from_secs(2)), None).unwrap();

        let err = client.conversations().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_base_path_is_treated_as_directory() {
        let base = Url::parse("http://localhost:5000/api").unwrap();
        let client = ApiClient::new(base, None, None).unwrap();
        assert_eq!(
            client.endpoint("/chat").unwrap().as_str(),
            "http://localhost:5000/api/chat"
        );
    }
}
