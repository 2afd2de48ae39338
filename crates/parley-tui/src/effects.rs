//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only, so the reducer never touches
//! the network or the durable store directly.

use parley_core::conversation::Conversation;
use parley_core::session::{LoadTicket, SendTicket};

use crate::common::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Post a `/chat` request for an issued ticket.
    SendMessage { ticket: SendTicket },

    /// Fetch a transcript for an issued ticket.
    LoadConversation { ticket: LoadTicket },

    /// Fetch the directory listing.
    RefreshConversations { task: TaskId },

    DeleteConversation { conversation_id: String },

    RenameConversation {
        conversation_id: String,
        new_name: String,
        previous: Option<Conversation>,
    },

    Search { task: TaskId, term: String },

    /// Mirror the active conversation id into the durable store.
    PersistConversationId { id: Option<String> },
}
