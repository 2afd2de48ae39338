//! Alert overlay for failures that need acknowledgement.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_overlay};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    pub title: String,
    pub message: String,
}

impl AlertState {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ' | 'q') => OverlayUpdate::close(),
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let hints = [InputHint::new("Enter", "dismiss")];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: &self.title,
                border_color: Color::Red,
                width: 56,
                height: 7,
                hints: &hints,
            },
        );

        let text = Line::from(Span::styled(
            self.message.as_str(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), layout.body);
    }
}
