//! UI event types.
//!
//! Everything the reducer reacts to arrives as a `UiEvent`: terminal input,
//! the frame/tick cadence from the runtime, and results posted to the inbox
//! by effect handlers.

use crossterm::event::Event;
use parley_core::api::ApiError;
use parley_core::api::types::{ChatReply, LoadedConversation, SearchHit};
use parley_core::conversation::Conversation;
use parley_core::session::{LoadTicket, SendTicket};

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    /// Render cadence. Only ticks trigger a redraw.
    Tick,
    /// Prepended to every batch with the current terminal size.
    Frame { width: u16, height: u16 },
    Terminal(Event),
    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },
    Session(SessionUiEvent),
}

/// Results of backend calls, reconciled by the reducer.
#[derive(Debug)]
pub enum SessionUiEvent {
    SendCompleted {
        ticket: SendTicket,
        result: Result<ChatReply, ApiError>,
    },
    LoadCompleted {
        ticket: LoadTicket,
        result: Result<LoadedConversation, ApiError>,
    },
    ConversationsLoaded {
        rows: Vec<Conversation>,
    },
    ConversationsFailed {
        error: ApiError,
    },
    DeleteCompleted {
        conversation_id: String,
        result: Result<String, ApiError>,
    },
    RenameCompleted {
        conversation_id: String,
        new_name: String,
        /// Row as it was before the optimistic update.
        previous: Option<Conversation>,
        result: Result<String, ApiError>,
    },
    SearchCompleted {
        task: TaskId,
        result: Result<Vec<SearchHit>, ApiError>,
    },
}
