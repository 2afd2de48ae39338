//! Search overlay: type a term, submit, then pick a hit to load.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use parley_core::api::types::SearchHit;
use parley_core::conversation::short_conversation_id;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::OverlayUpdate;
use super::render_utils::{
    InputHint, InputLine, OverlayConfig, render_input_line, render_overlay, render_separator,
};
use crate::common::{TaskId, truncate_with_ellipsis};
use crate::dispatch::Command;

const OVERLAY_WIDTH: u16 = 72;
const OVERLAY_HEIGHT: u16 = 20;
/// Rows used by one hit: subject line, user line, bot line.
const HIT_ROWS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    Input,
    Loading { task: TaskId },
    Results { hits: Vec<SearchHit>, selected: usize },
}

#[derive(Debug)]
pub struct SearchState {
    pub query: String,
    pub phase: SearchPhase,
    offset: usize,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            phase: SearchPhase::Input,
            offset: 0,
        }
    }

    /// Marks the overlay as waiting on `task`.
    pub fn begin(&mut self, task: TaskId) {
        self.phase = SearchPhase::Loading { task };
        self.offset = 0;
    }

    /// Installs results for `task`. Results for any other task are dropped.
    pub fn complete(&mut self, task: TaskId, hits: Vec<SearchHit>) -> bool {
        match self.phase {
            SearchPhase::Loading { task: pending } if pending == task => {
                self.phase = SearchPhase::Results { hits, selected: 0 };
                self.offset = 0;
                true
            }
            _ => false,
        }
    }

    /// Returns to query editing after a failed search.
    pub fn reset(&mut self) {
        self.phase = SearchPhase::Input;
        self.offset = 0;
    }

    pub fn selected_hit(&self) -> Option<&SearchHit> {
        match &self.phase {
            SearchPhase::Results { hits, selected } => hits.get(*selected),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        if key.code == KeyCode::Esc {
            return OverlayUpdate::close();
        }

        match &mut self.phase {
            SearchPhase::Loading { .. } => OverlayUpdate::stay(),
            SearchPhase::Results { hits, selected } => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    *selected = selected.saturating_sub(1);
                    OverlayUpdate::stay()
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if *selected + 1 < hits.len() {
                        *selected += 1;
                    }
                    OverlayUpdate::stay()
                }
                KeyCode::Enter => match self.selected_hit().map(|h| h.conversation_id.clone()) {
                    Some(conversation_id) => {
                        OverlayUpdate::close().with_command(Command::LoadConversation {
                            conversation_id,
                        })
                    }
                    None => {
                        self.reset();
                        OverlayUpdate::stay()
                    }
                },
                KeyCode::Char('/') | KeyCode::Backspace => {
                    self.reset();
                    OverlayUpdate::stay()
                }
                _ => OverlayUpdate::stay(),
            },
            SearchPhase::Input => match key.code {
                KeyCode::Enter => {
                    let term = self.query.trim();
                    if term.is_empty() {
                        OverlayUpdate::stay()
                    } else {
                        OverlayUpdate::stay().with_command(Command::Search {
                            term: term.to_string(),
                        })
                    }
                }
                KeyCode::Backspace => {
                    self.query.pop();
                    OverlayUpdate::stay()
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.query.clear();
                    OverlayUpdate::stay()
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.query.push(c);
                    OverlayUpdate::stay()
                }
                _ => OverlayUpdate::stay(),
            },
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        if self.phase == SearchPhase::Input {
            self.query
                .extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let hints: &[InputHint] = match self.phase {
            SearchPhase::Results { .. } => &[
                InputHint::new("↑↓", "select"),
                InputHint::new("Enter", "open"),
                InputHint::new("/", "new search"),
                InputHint::new("Esc", "close"),
            ],
            _ => &[InputHint::new("Enter", "search"), InputHint::new("Esc", "close")],
        };
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "Search",
                border_color: Color::Cyan,
                width: OVERLAY_WIDTH,
                height: OVERLAY_HEIGHT,
                hints,
            },
        );
        let body = layout.body;
        if body.height < 3 {
            return;
        }

        render_input_line(
            frame,
            Rect::new(body.x, body.y, body.width, 1),
            &InputLine {
                value: &self.query,
                placeholder: Some("search your conversations"),
                prompt: "> ",
                text_color: Color::White,
                cursor_color: Color::Cyan,
            },
        );
        render_separator(frame, body, 1);

        let list = Rect::new(body.x, body.y + 2, body.width, body.height - 2);
        let dim = Style::default().fg(Color::DarkGray);
        match &self.phase {
            SearchPhase::Input => {}
            SearchPhase::Loading { .. } => {
                frame.render_widget(Paragraph::new(Span::styled("Searching…", dim)), list);
            }
            SearchPhase::Results { hits, .. } if hits.is_empty() => {
                frame.render_widget(
                    Paragraph::new(Span::styled("No results found.", dim)),
                    list,
                );
            }
            SearchPhase::Results { hits, selected } => {
                let lines = self.hit_lines(hits, *selected, list);
                frame.render_widget(Paragraph::new(lines), list);
            }
        }
    }

    fn hit_lines(&self, hits: &[SearchHit], selected: usize, list: Rect) -> Vec<Line<'static>> {
        let visible = (list.height as usize / HIT_ROWS).max(1);
        let offset = if selected >= self.offset + visible {
            selected + 1 - visible
        } else {
            self.offset.min(selected)
        };
        let width = list.width.saturating_sub(4) as usize;

        let mut lines = Vec::with_capacity(visible * HIT_ROWS);
        for (index, hit) in hits.iter().enumerate().skip(offset).take(visible) {
            let is_selected = index == selected;
            let marker = if is_selected { "▶ " } else { "  " };
            let title_style = if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(vec![
                Span::styled(marker, title_style),
                Span::styled(truncate_with_ellipsis(hit.subject_or_na(), width), title_style),
                Span::styled(
                    format!("  {}", short_conversation_id(&hit.conversation_id)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled("You: ", Style::default().fg(Color::Green)),
                Span::raw(truncate_with_ellipsis(
                    &first_line(&hit.user),
                    width.saturating_sub(5),
                )),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled("Bot: ", Style::default().fg(Color::Blue)),
                Span::raw(truncate_with_ellipsis(
                    &first_line(&hit.bot),
                    width.saturating_sub(5),
                )),
            ]));
        }
        lines
    }
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn hit(id: &str) -> SearchHit {
        SearchHit {
            user: "q".into(),
            bot: "a".into(),
            subject: None,
            conversation_id: id.into(),
        }
    }

    fn type_query(state: &mut SearchState, text: &str) {
        for c in text.chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_blank_term_is_noop() {
        let mut state = SearchState::new();
        type_query(&mut state, "   ");
        let update = state.handle_key(key(KeyCode::Enter));
        assert!(update.commands.is_empty());
    }

    #[test]
    fn test_enter_submits_trimmed_term() {
        let mut state = SearchState::new();
        type_query(&mut state, " rust ");
        let update = state.handle_key(key(KeyCode::Enter));
        assert_eq!(
            update.commands,
            vec![Command::Search {
                term: "rust".into()
            }]
        );
    }

    #[test]
    fn test_results_from_other_task_are_dropped() {
        let mut state = SearchState::new();
        state.begin(TaskId(2));
        assert!(!state.complete(TaskId(1), vec![hit("old")]));
        assert!(state.complete(TaskId(2), vec![hit("c1"), hit("c2")]));

        state.handle_key(key(KeyCode::Down));
        let update = state.handle_key(key(KeyCode::Enter));
        assert_eq!(
            update,
            OverlayUpdate::close().with_command(Command::LoadConversation {
                conversation_id: "c2".into()
            })
        );
    }

    #[test]
    fn test_enter_on_empty_results_returns_to_input() {
        let mut state = SearchState::new();
        state.begin(TaskId(1));
        state.complete(TaskId(1), Vec::new());
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.phase, SearchPhase::Input);
    }
}
