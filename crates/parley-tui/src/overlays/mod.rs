//! Modal overlays.
//!
//! Overlays temporarily take over keyboard input. Each one owns its state,
//! key handler and render function, and reports what should happen next as
//! an `OverlayUpdate` the reducer applies.

pub mod alert;
pub mod confirm_delete;
pub mod render_utils;
pub mod search;

pub use alert::AlertState;
pub use confirm_delete::ConfirmDeleteState;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
pub use search::{SearchPhase, SearchState};

use crate::dispatch::Command;

/// Transition returned by overlay key handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Update returned by overlay key handlers.
#[derive(Debug, PartialEq, Eq)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub commands: Vec<Command>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            commands: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    #[must_use]
    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    Search(SearchState),
    ConfirmDelete(ConfirmDeleteState),
    Alert(AlertState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::Search(s) => s.render(frame, area),
            Overlay::ConfirmDelete(c) => c.render(frame, area),
            Overlay::Alert(a) => a.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::Search(s) => s.handle_key(key),
            Overlay::ConfirmDelete(c) => c.handle_key(key),
            Overlay::Alert(a) => a.handle_key(key),
        }
    }

    pub fn as_search_mut(&mut self) -> Option<&mut SearchState> {
        match self {
            Overlay::Search(s) => Some(s),
            _ => None,
        }
    }
}

/// Extension trait for `Option<Overlay>`.
pub trait OverlayExt {
    fn render(&self, frame: &mut Frame, area: Rect);
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(overlay) = self {
            overlay.render(frame, area);
        }
    }
}
