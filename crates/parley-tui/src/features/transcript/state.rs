//! Transcript state: ordered entries, typing indicator and scroll position.

use parley_core::conversation::{Message, Role};

/// Scroll mode for the transcript pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Auto-scroll to show the newest entry.
    FollowLatest,
    /// User scrolled manually; offset is the line index from the top.
    Anchored { offset: usize },
}

/// Scroll state for the transcript pane.
///
/// Line count and viewport height are refreshed from the layout every frame.
#[derive(Debug, Clone)]
pub struct ScrollState {
    pub mode: ScrollMode,
    pub cached_line_count: usize,
    pub viewport_height: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            mode: ScrollMode::FollowLatest,
            cached_line_count: 0,
            viewport_height: 0,
        }
    }
}

impl ScrollState {
    pub fn is_following(&self) -> bool {
        matches!(self.mode, ScrollMode::FollowLatest)
    }

    /// Offset of the first visible line.
    pub fn get_offset(&self) -> usize {
        let max_offset = self.cached_line_count.saturating_sub(self.viewport_height);
        match self.mode {
            ScrollMode::FollowLatest => max_offset,
            ScrollMode::Anchored { offset } => offset.min(max_offset),
        }
    }

    pub fn update_metrics(&mut self, line_count: usize, viewport_height: usize) {
        self.cached_line_count = line_count;
        self.viewport_height = viewport_height;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let new_offset = self.get_offset().saturating_sub(lines);
        self.mode = ScrollMode::Anchored { offset: new_offset };
    }

    /// Scrolls down, re-entering follow mode at the bottom.
    pub fn scroll_down(&mut self, lines: usize) {
        if self.is_following() {
            return;
        }
        let max_offset = self.cached_line_count.saturating_sub(self.viewport_height);
        let new_offset = (self.get_offset() + lines).min(max_offset);
        self.mode = if new_offset >= max_offset {
            ScrollMode::FollowLatest
        } else {
            ScrollMode::Anchored { offset: new_offset }
        };
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.mode = ScrollMode::Anchored { offset: 0 };
    }

    pub fn scroll_to_bottom(&mut self) {
        self.mode = ScrollMode::FollowLatest;
    }

    pub fn reset(&mut self) {
        self.mode = ScrollMode::FollowLatest;
        self.cached_line_count = 0;
    }
}

/// Rendered conversation: append-only entries in arrival order plus a
/// transient typing placeholder that is never counted as an entry.
#[derive(Debug, Clone, Default)]
pub struct TranscriptState {
    entries: Vec<Message>,
    typing: bool,
    pub scroll: ScrollState,
}

impl TranscriptState {
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        self.entries.push(Message::new(role, text));
        self.scroll.scroll_to_bottom();
    }

    /// Replaces every entry (used when a conversation is loaded).
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.entries = messages;
        self.typing = false;
        self.scroll.reset();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.typing = false;
        self.scroll.reset();
    }

    pub fn show_typing(&mut self) {
        self.typing = true;
        self.scroll.scroll_to_bottom();
    }

    pub fn hide_typing(&mut self) {
        self.typing = false;
    }

    /// Entries rendered as `role: text`, for tests and plain output.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}
