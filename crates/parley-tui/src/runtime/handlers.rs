//! Effect handlers.
//!
//! Each handler is a pure async function: it performs one backend call and
//! returns the `UiEvent` describing the result. The runtime spawns them and
//! forwards the event to the inbox. Handlers never touch state.

use parley_core::api::ApiClient;
use parley_core::conversation::Conversation;
use parley_core::session::{LoadTicket, SendTicket};

use crate::common::TaskId;
use crate::events::{SessionUiEvent, UiEvent};

pub async fn send_message(client: ApiClient, ticket: SendTicket) -> UiEvent {
    let result = client.chat(&ticket.to_request()).await;
    if let Err(error) = &result {
        tracing::warn!(%error, "chat request failed");
    }
    UiEvent::Session(SessionUiEvent::SendCompleted { ticket, result })
}

pub async fn load_conversation(client: ApiClient, ticket: LoadTicket) -> UiEvent {
    let result = client.load_conversation(&ticket.conversation_id).await;
    UiEvent::Session(SessionUiEvent::LoadCompleted { ticket, result })
}

pub async fn list_conversations(client: ApiClient) -> UiEvent {
    match client.conversations().await {
        Ok(rows) => {
            tracing::debug!(count = rows.len(), "fetched conversations");
            UiEvent::Session(SessionUiEvent::ConversationsLoaded { rows })
        }
        Err(error) => UiEvent::Session(SessionUiEvent::ConversationsFailed { error }),
    }
}

pub async fn delete_conversation(client: ApiClient, conversation_id: String) -> UiEvent {
    let result = client.delete_conversation(&conversation_id).await;
    UiEvent::Session(SessionUiEvent::DeleteCompleted {
        conversation_id,
        result,
    })
}

pub async fn rename_conversation(
    client: ApiClient,
    conversation_id: String,
    new_name: String,
    previous: Option<Conversation>,
) -> UiEvent {
    let result = client.rename_conversation(&conversation_id, &new_name).await;
    UiEvent::Session(SessionUiEvent::RenameCompleted {
        conversation_id,
        new_name,
        previous,
        result,
    })
}

pub async fn search(client: ApiClient, task: TaskId, term: String) -> UiEvent {
    let result = client.search(&term).await;
    UiEvent::Session(SessionUiEvent::SearchCompleted { task, result })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use parley_core::api::ApiError;
    use parley_core::session::SessionState;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> ApiClient {
        let base = Url::parse(&server.uri()).unwrap();
        ApiClient::new(base, Some(Duration::from_secs(5)), Some("session=abc".into())).unwrap()
    }

    #[tokio::test]
    async fn test_send_message_carries_ticket_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reply": "Hi",
                "conversation_id": "abc123"
            })))
            .mount(&server)
            .await;

        let mut session = SessionState::new();
        let ticket = session.begin_send("Hello", None).unwrap();
        let event = send_message(client_for(&server), ticket.clone()).await;

        match event {
            UiEvent::Session(SessionUiEvent::SendCompleted {
                ticket: returned,
                result,
            }) => {
                assert_eq!(returned, ticket);
                assert_eq!(result.unwrap().conversation_id.as_deref(), Some("abc123"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_failure_maps_to_failed_event() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/conversations"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let event = list_conversations(client_for(&server)).await;
        assert!(matches!(
            event,
            UiEvent::Session(SessionUiEvent::ConversationsFailed {
                error: ApiError::Server {
                    status: Some(401),
                    ..
                }
            })
        ));
    }

    #[tokio::test]
    async fn test_search_keeps_task_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let event = search(client_for(&server), TaskId(7), "rust".into()).await;
        assert!(matches!(
            event,
            UiEvent::Session(SessionUiEvent::SearchCompleted {
                task: TaskId(7),
                result: Ok(ref hits),
            }) if hits.is_empty()
        ));
    }
}
