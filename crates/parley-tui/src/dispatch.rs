//! User commands.
//!
//! Every user action that reaches the backend goes through exactly one
//! `Command`. Key handlers, mouse handlers and overlays produce commands;
//! `dispatch` applies the immediate state change and returns the effects
//! that perform the I/O.

use parley_core::conversation::Role;
use parley_core::session::SendRejected;

use crate::effects::UiEffect;
use crate::features::directory::DirectoryView;
use crate::state::{Focus, StatusLevel, TuiState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SendMessage {
        text: String,
    },
    StartNew,
    LoadConversation {
        conversation_id: String,
    },
    DeleteConversation {
        conversation_id: String,
    },
    RenameConversation {
        conversation_id: String,
        new_name: String,
    },
    Search {
        term: String,
    },
    RefreshDirectory,
}

pub fn dispatch(tui: &mut TuiState, command: Command) -> Vec<UiEffect> {
    match command {
        Command::SendMessage { text } => send_message(tui, &text),
        Command::StartNew => start_new(tui),
        Command::LoadConversation { conversation_id } => load_conversation(tui, &conversation_id),
        Command::DeleteConversation { conversation_id } => {
            vec![UiEffect::DeleteConversation { conversation_id }]
        }
        Command::RenameConversation {
            conversation_id,
            new_name,
        } => rename_conversation(tui, conversation_id, &new_name),
        Command::Search { term } => {
            let term = term.trim();
            if term.is_empty() {
                return vec![];
            }
            vec![UiEffect::Search {
                task: tui.task_seq.next_id(),
                term: term.to_string(),
            }]
        }
        Command::RefreshDirectory => refresh_directory(tui),
    }
}

/// Effects issued once when the TUI starts.
pub fn bootstrap(tui: &mut TuiState) -> Vec<UiEffect> {
    let mut effects = refresh_directory(tui);
    if let Some(id) = tui.session.active_conversation_id().map(String::from) {
        effects.extend(load_conversation(tui, &id));
    }
    effects
}

fn send_message(tui: &mut TuiState, text: &str) -> Vec<UiEffect> {
    let subject = tui.composer.subject_if_set().map(String::from);
    match tui.session.begin_send(text, subject.as_deref()) {
        Ok(ticket) => {
            tui.transcript.append(Role::User, ticket.message.clone());
            tui.transcript.show_typing();
            tui.composer.buffer.clear();
            if tui.focus == Focus::Subject {
                tui.focus = Focus::Composer;
            }
            vec![UiEffect::SendMessage { ticket }]
        }
        Err(SendRejected::Empty) => vec![],
        Err(SendRejected::InFlight) => {
            tui.set_status("Still waiting for the last reply.", StatusLevel::Warn);
            vec![]
        }
    }
}

fn start_new(tui: &mut TuiState) -> Vec<UiEffect> {
    tui.session.start_new();
    tui.transcript.clear();
    tui.composer.subject.clear();
    tui.set_status("Started a new conversation.", StatusLevel::Info);
    vec![UiEffect::PersistConversationId { id: None }]
}

fn load_conversation(tui: &mut TuiState, conversation_id: &str) -> Vec<UiEffect> {
    let ticket = tui.session.begin_load(conversation_id);
    tui.transcript.hide_typing();
    tui.directory.select(conversation_id);
    tui.normalize_focus();
    vec![UiEffect::LoadConversation { ticket }]
}

fn rename_conversation(
    tui: &mut TuiState,
    conversation_id: String,
    new_name: &str,
) -> Vec<UiEffect> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        tui.directory.cancel_edit();
        return vec![];
    }
    let previous = tui.directory.apply_title(&conversation_id, new_name);
    vec![UiEffect::RenameConversation {
        conversation_id,
        new_name: new_name.to_string(),
        previous,
    }]
}

fn refresh_directory(tui: &mut TuiState) -> Vec<UiEffect> {
    if !tui.signed_in {
        tui.directory.view = DirectoryView::SignedOut;
        return vec![];
    }
    tui.directory.begin_refresh();
    vec![UiEffect::RefreshConversations {
        task: tui.task_seq.next_id(),
    }]
}
