//! Delete confirmation overlay.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_overlay};
use crate::common::truncate_with_ellipsis;
use crate::dispatch::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDeleteState {
    pub conversation_id: String,
    pub label: String,
}

impl ConfirmDeleteState {
    pub fn new(conversation_id: String, label: String) -> Self {
        Self {
            conversation_id,
            label,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y' | 'Y') => {
                OverlayUpdate::close().with_command(Command::DeleteConversation {
                    conversation_id: self.conversation_id.clone(),
                })
            }
            KeyCode::Esc | KeyCode::Char('n' | 'N') => OverlayUpdate::close(),
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let hints = [
            InputHint::new("y", "delete"),
            InputHint::new("n", "cancel"),
        ];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "Delete conversation",
                border_color: Color::Yellow,
                width: 50,
                height: 6,
                hints: &hints,
            },
        );

        let label = truncate_with_ellipsis(&self.label, layout.body.width.saturating_sub(2) as usize);
        let lines = vec![
            Line::from("Delete this conversation?"),
            Line::from(Span::styled(
                format!("“{label}”"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), layout.body);
    }
}
