//! Conversation session state machine.
//!
//! `SessionState` owns the identity of the active conversation and its
//! cached subject. Every asynchronous operation is split into a `begin_*`
//! call that returns a ticket and a `complete_*` call that reconciles the
//! result. Tickets carry the generation they were issued under; completions
//! from an older generation are reported as stale and leave state untouched.
//!
//! The state is pure: callers mirror [`SessionState::active_conversation_id`]
//! into the durable store after each transition.

use thiserror::Error;

use crate::api::ApiError;
use crate::api::types::{ChatReply, ChatRequest, LoadedConversation};
use crate::conversation::Message;

/// Whether the session is bound to a server-side conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No server id yet. The next successful send adopts one.
    #[default]
    New,
    /// Bound to a server-assigned conversation id.
    Active { conversation_id: String },
}

/// Why a send was refused before any request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendRejected {
    #[error("message must not be empty")]
    Empty,
    #[error("a message is already being sent")]
    InFlight,
}

/// An issued `/chat` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTicket {
    generation: u64,
    pub message: String,
    pub conversation_id: Option<String>,
    pub subject: Option<String>,
}

impl SendTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Request body. A new conversation's subject doubles as its name.
    pub fn to_request(&self) -> ChatRequest {
        ChatRequest {
            message: self.message.clone(),
            conversation_id: self.conversation_id.clone(),
            conversation_name: self.subject.clone(),
            subject: self.subject.clone(),
        }
    }
}

/// Reconciled result of a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The session moved on while the request was outstanding.
    Stale,
    Replied {
        reply: String,
        /// Set when this reply moved the session from new to active.
        adopted: Option<String>,
    },
    Failed {
        message: String,
    },
}

/// An issued `/load_conversation` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub conversation_id: String,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Reconciled result of a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Stale,
    Loaded {
        messages: Vec<Message>,
        subject: Option<String>,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    phase: SessionPhase,
    pending_subject: Option<String>,
    generation: u64,
    /// Generation of the outstanding send, if any.
    in_flight: Option<u64>,
    /// Target of the outstanding load, if any.
    loading: Option<String>,
}

impl SessionState {
    /// A fresh session with no active conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes a persisted conversation id. Blank ids start a new session.
    pub fn resume(conversation_id: Option<&str>) -> Self {
        let phase = match conversation_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => SessionPhase::Active {
                conversation_id: id.to_string(),
            },
            None => SessionPhase::New,
        };
        Self {
            phase,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn active_conversation_id(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::New => None,
            SessionPhase::Active { conversation_id } => Some(conversation_id),
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self.phase, SessionPhase::New)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_conversation_id() == Some(id)
    }

    pub fn pending_subject(&self) -> Option<&str> {
        self.pending_subject.as_deref()
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = None;
    }

    /// Drops the active conversation and returns to the new phase.
    pub fn start_new(&mut self) {
        self.phase = SessionPhase::New;
        self.pending_subject = None;
        self.loading = None;
        self.bump_generation();
    }

    /// Validates and issues a send.
    ///
    /// `subject_if_new` is only forwarded while the session is new.
    pub fn begin_send(
        &mut self,
        text: &str,
        subject_if_new: Option<&str>,
    ) -> Result<SendTicket, SendRejected> {
        let message = text.trim();
        if message.is_empty() {
            return Err(SendRejected::Empty);
        }
        if self.in_flight.is_some() {
            return Err(SendRejected::InFlight);
        }

        let subject = if self.is_new() {
            subject_if_new
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        } else {
            None
        };

        self.in_flight = Some(self.generation);
        Ok(SendTicket {
            generation: self.generation,
            message: message.to_string(),
            conversation_id: self.active_conversation_id().map(String::from),
            subject,
        })
    }

    /// Reconciles a `/chat` result.
    pub fn complete_send(
        &mut self,
        ticket: &SendTicket,
        result: Result<ChatReply, ApiError>,
    ) -> SendOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale send completion"
            );
            return SendOutcome::Stale;
        }
        if self.in_flight == Some(ticket.generation) {
            self.in_flight = None;
        }

        match result {
            Ok(reply) => {
                let mut adopted = None;
                if self.is_new() {
                    if let Some(id) = reply
                        .conversation_id
                        .as_deref()
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                    {
                        self.phase = SessionPhase::Active {
                            conversation_id: id.to_string(),
                        };
                        self.pending_subject = reply
                            .subject
                            .clone()
                            .filter(|s| !s.trim().is_empty())
                            .or_else(|| ticket.subject.clone());
                        adopted = Some(id.to_string());
                    }
                }
                SendOutcome::Replied {
                    reply: reply.reply,
                    adopted,
                }
            }
            Err(err) => SendOutcome::Failed {
                message: err.to_string(),
            },
        }
    }

    /// Issues a load. Anything still outstanding becomes stale.
    pub fn begin_load(&mut self, conversation_id: &str) -> LoadTicket {
        self.bump_generation();
        self.loading = Some(conversation_id.to_string());
        LoadTicket {
            generation: self.generation,
            conversation_id: conversation_id.to_string(),
        }
    }

    /// Reconciles a `/load_conversation` result.
    ///
    /// On failure the active conversation is left at its prior value.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<LoadedConversation, ApiError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                conversation_id = %ticket.conversation_id,
                "discarding stale load completion"
            );
            return LoadOutcome::Stale;
        }
        self.loading = None;

        match result {
            Ok(loaded) => {
                self.phase = SessionPhase::Active {
                    conversation_id: ticket.conversation_id.clone(),
                };
                self.pending_subject = loaded.subject.clone();
                LoadOutcome::Loaded {
                    messages: loaded.transcript(),
                    subject: loaded.subject,
                }
            }
            Err(err) => LoadOutcome::Failed {
                message: err.to_string(),
            },
        }
    }

    /// Applies a confirmed deletion. Returns true when the active
    /// conversation was deleted and the session reset.
    ///
    /// An outstanding load of another conversation stays current, so the
    /// session lands on that conversation once it completes.
    pub fn complete_delete(&mut self, conversation_id: &str) -> bool {
        if !self.is_active(conversation_id) {
            return false;
        }
        if self
            .loading
            .as_deref()
            .is_some_and(|target| target != conversation_id)
        {
            self.phase = SessionPhase::New;
            self.pending_subject = None;
        } else {
            self.start_new();
        }
        true
    }

    /// Applies a confirmed rename. Returns true when it touched the active
    /// conversation.
    pub fn apply_rename(&mut self, conversation_id: &str, new_name: &str) -> bool {
        if self.is_active(conversation_id) {
            self.pending_subject = Some(new_name.to_string());
            true
        } else {
            false
        }
    }
}
