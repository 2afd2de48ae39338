//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── session: SessionState     (active conversation, generation)
//! │   ├── transcript: TranscriptState
//! │   ├── directory: DirectoryState (sidebar rows, inline editor)
//! │   ├── composer: ComposerState   (message buffer, subject)
//! │   ├── task_seq / tasks          (latest-only task gating)
//! │   └── layout: AppLayout         (rects from the last frame)
//! └── overlay: Option<Overlay>
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay
//! handlers can borrow both mutably at the same time.

use std::time::{Duration, Instant};

use parley_core::config::Config;
use parley_core::session::SessionState;

use crate::common::{TaskSeq, Tasks};
use crate::features::composer::ComposerState;
use crate::features::directory::DirectoryState;
use crate::features::transcript::TranscriptState;
use crate::overlays::Overlay;
use crate::render::AppLayout;

/// How long a status notice stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(4);

pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(tui: TuiState) -> Self {
        Self { tui, overlay: None }
    }
}

/// Which pane receives keys when no overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Subject,
    Composer,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
}

#[derive(Debug, Clone)]
pub struct StatusNotice {
    pub text: String,
    pub level: StatusLevel,
    pub set_at: Instant,
}

pub struct TuiState {
    pub should_quit: bool,
    pub session: SessionState,
    pub transcript: TranscriptState,
    pub directory: DirectoryState,
    pub composer: ComposerState,
    pub focus: Focus,
    pub show_sidebar: bool,
    /// Whether a session cookie was present at startup.
    pub signed_in: bool,
    /// Backend URL shown in the status bar.
    pub server_label: String,
    pub status: Option<StatusNotice>,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    pub spinner_frame: usize,
    /// Rects computed on the last `Frame` event, used for mouse routing.
    pub layout: AppLayout,
}

impl TuiState {
    pub fn new(
        config: &Config,
        server_label: String,
        signed_in: bool,
        resumed_conversation: Option<&str>,
    ) -> Self {
        Self {
            should_quit: false,
            session: SessionState::resume(resumed_conversation),
            transcript: TranscriptState::default(),
            directory: DirectoryState::new(signed_in),
            composer: ComposerState::default(),
            focus: Focus::Composer,
            show_sidebar: config.show_sidebar,
            signed_in,
            server_label,
            status: None,
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
            layout: AppLayout::default(),
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusNotice {
            text: text.into(),
            level,
            set_at: Instant::now(),
        });
    }

    /// Drops the status notice once it has been shown long enough.
    pub fn expire_status(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|s| s.set_at.elapsed() >= STATUS_TTL)
        {
            self.status = None;
        }
    }

    /// Welcome placeholder shows for an empty, new session.
    pub fn show_welcome(&self) -> bool {
        self.session.is_new() && self.transcript.is_empty()
    }

    /// Label of the active conversation for the subject bar.
    pub fn active_label(&self) -> Option<String> {
        let id = self.session.active_conversation_id()?;
        if let Some(subject) = self
            .session
            .pending_subject()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return Some(subject.to_string());
        }
        Some(
            self.directory
                .label_of(id)
                .unwrap_or_else(|| parley_core::conversation::resolve_label(None, None, id)),
        )
    }

    /// Cycles focus. The subject field is only reachable while new.
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Subject => Focus::Composer,
            Focus::Composer if self.show_sidebar => Focus::Directory,
            Focus::Composer | Focus::Directory if self.session.is_new() => Focus::Subject,
            Focus::Composer | Focus::Directory => Focus::Composer,
        };
    }

    /// Moves focus off panes that are no longer shown.
    pub fn normalize_focus(&mut self) {
        match self.focus {
            Focus::Subject if !self.session.is_new() => self.focus = Focus::Composer,
            Focus::Directory if !self.show_sidebar => self.focus = Focus::Composer,
            _ => {}
        }
    }
}
