//! Transcript rendering.

use parley_core::conversation::Role;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::TranscriptState;
use crate::common::text::sanitize_for_display;
use crate::common::wrap_text;

/// Width of the role gutter ("You   ").
const GUTTER_WIDTH: usize = 6;

/// Render frames per spinner frame.
pub const SPINNER_SPEED_DIVISOR: usize = 6;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Bot => "Bot",
        Role::Error => "Error",
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        Role::Bot => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        Role::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

fn body_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().add_modifier(Modifier::ITALIC),
        Role::Bot => Style::default(),
        Role::Error => Style::default().fg(Color::Red),
    }
}

fn welcome_lines() -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "Start a new conversation",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Type a message below and press Enter to send.",
            dim,
        )),
        Line::from(Span::styled(
            "Tab to set a subject first, Ctrl+F to search past conversations.",
            dim,
        )),
    ]
}

/// Builds every transcript line for the given width.
///
/// `show_welcome` replaces an empty transcript with the welcome placeholder.
pub fn build_lines(
    transcript: &TranscriptState,
    width: usize,
    show_welcome: bool,
    spinner_frame: usize,
) -> Vec<Line<'static>> {
    if transcript.is_empty() && !transcript.is_typing() {
        return if show_welcome {
            welcome_lines()
        } else {
            Vec::new()
        };
    }

    let body_width = width.saturating_sub(GUTTER_WIDTH).max(1);
    let mut lines = Vec::new();

    for message in transcript.entries() {
        let text = sanitize_for_display(&message.text);
        for (i, wrapped) in wrap_text(&text, body_width).into_iter().enumerate() {
            let gutter = if i == 0 {
                Span::styled(
                    format!("{:<GUTTER_WIDTH$}", role_label(message.role)),
                    role_style(message.role),
                )
            } else {
                Span::raw(" ".repeat(GUTTER_WIDTH))
            };
            lines.push(Line::from(vec![
                gutter,
                Span::styled(wrapped, body_style(message.role)),
            ]));
        }
        lines.push(Line::from(""));
    }

    if transcript.is_typing() {
        let spinner = SPINNER_FRAMES[(spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len()];
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<GUTTER_WIDTH$}", role_label(Role::Bot)),
                role_style(Role::Bot),
            ),
            Span::styled(
                format!("{spinner} typing…"),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines
}

pub fn line_count(transcript: &TranscriptState, width: usize, show_welcome: bool) -> usize {
    build_lines(transcript, width, show_welcome, 0).len()
}

pub fn render_transcript(
    frame: &mut Frame,
    area: Rect,
    transcript: &TranscriptState,
    show_welcome: bool,
    spinner_frame: usize,
) {
    let lines = build_lines(transcript, area.width as usize, show_welcome, spinner_frame);
    let offset = transcript.scroll.get_offset();
    let visible: Vec<Line<'static>> = lines
        .into_iter()
        .skip(offset)
        .take(area.height as usize)
        .collect();
    frame.render_widget(Paragraph::new(visible), area);
}
