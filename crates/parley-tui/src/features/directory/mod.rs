//! Conversation directory: the sidebar list of the user's conversations.

mod render;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use parley_core::conversation::Conversation;
use ratatui::layout::Rect;
pub use render::render_directory;

/// Columns reserved at the right of each row for one affordance.
pub const AFFORDANCE_WIDTH: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryView {
    /// No session cookie; a sign-in prompt is shown and nothing is fetched.
    SignedOut,
    Loading,
    Ready,
    Failed(String),
}

/// Inline row editor for renaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEditor {
    pub conversation_id: String,
    pub input: String,
}

/// Which part of a row a click landed on. Exactly one per click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowHit {
    Body,
    Edit,
    Delete,
}

/// What a directory interaction asks the reducer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryAction {
    None,
    Load {
        conversation_id: String,
    },
    ConfirmDelete {
        conversation_id: String,
        label: String,
    },
    Rename {
        conversation_id: String,
        new_name: String,
    },
}

#[derive(Debug, Clone)]
pub struct DirectoryState {
    rows: Vec<Conversation>,
    pub selected: usize,
    pub view: DirectoryView,
    pub editor: Option<RowEditor>,
    pub scroll_offset: usize,
    /// Visible row count from the last layout pass.
    pub viewport_rows: usize,
}

impl DirectoryState {
    pub fn new(signed_in: bool) -> Self {
        Self {
            rows: Vec::new(),
            selected: 0,
            view: if signed_in {
                DirectoryView::Loading
            } else {
                DirectoryView::SignedOut
            },
            editor: None,
            scroll_offset: 0,
            viewport_rows: 0,
        }
    }

    pub fn rows(&self) -> &[Conversation] {
        &self.rows
    }

    pub fn selected_row(&self) -> Option<&Conversation> {
        self.rows.get(self.selected)
    }

    pub fn row(&self, conversation_id: &str) -> Option<&Conversation> {
        self.rows.iter().find(|r| r.id == conversation_id)
    }

    pub fn label_of(&self, conversation_id: &str) -> Option<String> {
        self.row(conversation_id).map(Conversation::display_label)
    }

    pub fn begin_refresh(&mut self) {
        self.view = DirectoryView::Loading;
    }

    /// Replaces the rows, keeping the selection on the same conversation
    /// when it still exists.
    pub fn set_rows(&mut self, rows: Vec<Conversation>) {
        let selected_id = self.selected_row().map(|r| r.id.clone());
        self.rows = rows;
        self.view = DirectoryView::Ready;
        self.selected = selected_id
            .and_then(|id| self.rows.iter().position(|r| r.id == id))
            .unwrap_or(0);
        if self
            .editor
            .as_ref()
            .is_some_and(|e| self.row(&e.conversation_id).is_none())
        {
            self.editor = None;
        }
        self.ensure_visible();
    }

    pub fn set_failed(&mut self, error: String) {
        self.view = DirectoryView::Failed(error);
    }

    pub fn select(&mut self, conversation_id: &str) {
        if let Some(idx) = self.rows.iter().position(|r| r.id == conversation_id) {
            self.selected = idx;
            self.ensure_visible();
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
        self.ensure_visible();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.ensure_visible();
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows;
        self.ensure_visible();
    }

    fn ensure_visible(&mut self) {
        if self.viewport_rows == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + self.viewport_rows {
            self.scroll_offset = self.selected + 1 - self.viewport_rows;
        }
        let max_offset = self.rows.len().saturating_sub(self.viewport_rows);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Switches a row into the inline editor, prefilled with its title.
    /// Untitled rows start empty rather than with the placeholder label.
    pub fn begin_edit(&mut self, index: usize) {
        if let Some(row) = self.rows.get(index) {
            self.selected = index;
            let title = [row.subject.as_deref(), row.name.as_deref()]
                .into_iter()
                .flatten()
                .map(str::trim)
                .find(|t| !t.is_empty())
                .unwrap_or_default();
            self.editor = Some(RowEditor {
                conversation_id: row.id.clone(),
                input: title.to_string(),
            });
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    /// Shows `title` on a row ahead of server confirmation. Returns the row
    /// as it was, for [`DirectoryState::restore`].
    pub fn apply_title(&mut self, conversation_id: &str, title: &str) -> Option<Conversation> {
        let row = self.rows.iter_mut().find(|r| r.id == conversation_id)?;
        let previous = row.clone();
        row.subject = Some(title.to_string());
        row.name = Some(title.to_string());
        Some(previous)
    }

    pub fn restore(&mut self, previous: Conversation) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.id == previous.id) {
            *row = previous;
        }
    }

    /// Maps a click inside the list area to a row and the part hit.
    pub fn hit_test(&self, list_area: Rect, column: u16, row: u16) -> Option<(usize, RowHit)> {
        if !matches!(self.view, DirectoryView::Ready | DirectoryView::Loading)
            || column < list_area.x
            || column >= list_area.x + list_area.width
            || row < list_area.y
            || row >= list_area.y + list_area.height
        {
            return None;
        }

        let index = self.scroll_offset + (row - list_area.y) as usize;
        if index >= self.rows.len() {
            return None;
        }

        let right = list_area.x + list_area.width;
        let hit = if list_area.width <= AFFORDANCE_WIDTH * 2 {
            RowHit::Body
        } else if column >= right - AFFORDANCE_WIDTH {
            RowHit::Delete
        } else if column >= right - AFFORDANCE_WIDTH * 2 {
            RowHit::Edit
        } else {
            RowHit::Body
        };
        Some((index, hit))
    }

    /// Applies a click. Returns the single action it triggers.
    pub fn handle_click(&mut self, list_area: Rect, column: u16, row: u16) -> DirectoryAction {
        let Some((index, hit)) = self.hit_test(list_area, column, row) else {
            return DirectoryAction::None;
        };
        let row_id = self.rows.get(index).map(|r| r.id.as_str());
        if self
            .editor
            .as_ref()
            .is_some_and(|e| Some(e.conversation_id.as_str()) == row_id)
        {
            return DirectoryAction::None;
        }
        self.editor = None;
        self.selected = index;
        match hit {
            RowHit::Body => self.load_selected(),
            RowHit::Edit => {
                self.begin_edit(index);
                DirectoryAction::None
            }
            RowHit::Delete => self.confirm_delete_selected(),
        }
    }

    fn load_selected(&self) -> DirectoryAction {
        self.selected_row()
            .map_or(DirectoryAction::None, |r| DirectoryAction::Load {
                conversation_id: r.id.clone(),
            })
    }

    fn confirm_delete_selected(&self) -> DirectoryAction {
        self.selected_row()
            .map_or(DirectoryAction::None, |r| DirectoryAction::ConfirmDelete {
                conversation_id: r.id.clone(),
                label: r.display_label(),
            })
    }
}

/// Handles a key while the directory has focus.
pub fn handle_key(dir: &mut DirectoryState, key: KeyEvent) -> DirectoryAction {
    if let Some(editor) = dir.editor.as_mut() {
        return match key.code {
            KeyCode::Enter => {
                let conversation_id = editor.conversation_id.clone();
                let new_name = editor.input.clone();
                dir.editor = None;
                DirectoryAction::Rename {
                    conversation_id,
                    new_name,
                }
            }
            KeyCode::Esc => {
                dir.editor = None;
                DirectoryAction::None
            }
            KeyCode::Backspace => {
                editor.input.pop();
                DirectoryAction::None
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                editor.input.push(c);
                DirectoryAction::None
            }
            _ => DirectoryAction::None,
        };
    }

    if !matches!(dir.view, DirectoryView::Ready | DirectoryView::Loading) {
        return DirectoryAction::None;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            dir.select_prev();
            DirectoryAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            dir.select_next();
            DirectoryAction::None
        }
        KeyCode::Home => {
            dir.selected = 0;
            dir.ensure_visible();
            DirectoryAction::None
        }
        KeyCode::End => {
            dir.selected = dir.rows.len().saturating_sub(1);
            dir.ensure_visible();
            DirectoryAction::None
        }
        KeyCode::Enter => dir.load_selected(),
        KeyCode::Char('e') => {
            dir.begin_edit(dir.selected);
            DirectoryAction::None
        }
        KeyCode::Char('d') | KeyCode::Delete => dir.confirm_delete_selected(),
        _ => DirectoryAction::None,
    }
}
