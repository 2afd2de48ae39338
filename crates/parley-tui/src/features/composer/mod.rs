//! Composer feature: the message editor and the new-conversation subject.

mod text_buffer;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
pub use text_buffer::{CursorMove, TextBuffer};

use crate::common::truncate_with_ellipsis;

/// Most composer lines shown before the box stops growing.
const MAX_VISIBLE_LINES: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct ComposerState {
    /// Subject for the next new conversation.
    pub subject: String,
    pub buffer: TextBuffer,
}

/// What a composer key asks the reducer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerAction {
    None,
    Submit { text: String },
}

impl ComposerState {
    /// Subject to forward with a send, if one was typed.
    pub fn subject_if_set(&self) -> Option<&str> {
        Some(self.subject.trim()).filter(|s| !s.is_empty())
    }

    /// Rows needed to draw the composer including its border.
    pub fn height(&self) -> u16 {
        (self.buffer.lines().len().clamp(1, MAX_VISIBLE_LINES) + 2) as u16
    }
}

/// Handles a key while the composer has focus.
///
/// Plain Enter submits; Shift+Enter and Alt+Enter insert a newline.
pub fn handle_key(composer: &mut ComposerState, key: KeyEvent) -> ComposerAction {
    match key.code {
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            composer.buffer.insert_newline();
            ComposerAction::None
        }
        KeyCode::Enter => ComposerAction::Submit {
            text: composer.buffer.text(),
        },
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            composer.buffer.insert_newline();
            ComposerAction::None
        }
        _ => {
            composer.buffer.input(key);
            ComposerAction::None
        }
    }
}

/// Handles a key while the subject field has focus.
pub fn handle_subject_key(composer: &mut ComposerState, key: KeyEvent) {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return;
    }
    match key.code {
        KeyCode::Char(c) => composer.subject.push(c),
        KeyCode::Backspace => {
            composer.subject.pop();
        }
        _ => {}
    }
}

pub fn handle_paste(composer: &mut ComposerState, subject_focused: bool, text: &str) {
    if subject_focused {
        composer
            .subject
            .push_str(&text.replace(['\r', '\n'], " "));
    } else {
        composer.buffer.insert_str(&text.replace('\r', ""));
    }
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Draws the subject bar: an input while the session is new, otherwise the
/// active conversation's label.
pub fn render_subject_bar(
    frame: &mut Frame,
    area: Rect,
    composer: &ComposerState,
    active_label: Option<&str>,
    focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(focused))
        .title(" Subject ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let line = if let Some(label) = active_label {
        Line::from(Span::styled(
            truncate_with_ellipsis(label, width),
            Style::default().add_modifier(Modifier::BOLD),
        ))
    } else if composer.subject.is_empty() {
        let mut spans = Vec::new();
        if focused {
            spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }
        spans.push(Span::styled(
            "Optional subject for the new conversation",
            Style::default().fg(Color::DarkGray),
        ));
        Line::from(spans)
    } else {
        let mut spans = vec![Span::raw(truncate_with_ellipsis(
            &composer.subject,
            width.saturating_sub(1),
        ))];
        if focused {
            spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line), inner);
}

pub fn render_composer(
    frame: &mut Frame,
    area: Rect,
    composer: &ComposerState,
    focused: bool,
    sending: bool,
) {
    let title = if sending {
        " Message (waiting for reply) "
    } else {
        " Message "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(focused))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (cursor_row, _) = composer.buffer.cursor();
    let visible = inner.height as usize;
    let first = (cursor_row + 1).saturating_sub(visible);

    let lines: Vec<Line> = composer
        .buffer
        .lines()
        .iter()
        .skip(first)
        .take(visible)
        .map(|l| Line::from(l.as_str()))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    if focused {
        let (row, col) = composer.buffer.cursor();
        let line = &composer.buffer.lines()[row];
        let prefix: String = line.chars().take(col).collect();
        let x = unicode_width::UnicodeWidthStr::width(prefix.as_str()) as u16;
        let y = (row - first) as u16;
        if x < inner.width && y < inner.height {
            frame.set_cursor_position((inner.x + x, inner.y + y));
        }
    }
}
