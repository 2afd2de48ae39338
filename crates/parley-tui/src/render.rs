//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects. Layout math lives in `compute_layout`
//! so the reducer can use the same rects for scrolling and mouse routing.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::truncate_with_ellipsis;
use crate::features::{composer, directory, transcript};
use crate::overlays::OverlayExt;
use crate::state::{AppState, Focus, StatusLevel, TuiState};

const STATUS_HEIGHT: u16 = 1;
const SUBJECT_HEIGHT: u16 = 3;
/// Horizontal padding on each side of the transcript.
pub const TRANSCRIPT_MARGIN: u16 = 1;
const SIDEBAR_MAX_WIDTH: u16 = 34;
/// Narrower terminals hide the sidebar regardless of the toggle.
const SIDEBAR_MIN_TERMINAL_WIDTH: u16 = 60;

/// Rects for every pane, computed once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppLayout {
    pub sidebar: Option<Rect>,
    /// Inner area of the sidebar block where rows are drawn.
    pub directory_list: Option<Rect>,
    pub subject: Rect,
    pub transcript: Rect,
    pub composer: Rect,
    pub status: Rect,
}

pub fn compute_layout(area: Rect, show_sidebar: bool, composer_height: u16) -> AppLayout {
    let sidebar_visible = show_sidebar && area.width >= SIDEBAR_MIN_TERMINAL_WIDTH;
    let (sidebar, main) = if sidebar_visible {
        let width = (area.width / 3).min(SIDEBAR_MAX_WIDTH);
        let [sidebar, main] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(width), Constraint::Min(1)])
            .areas(area);
        (Some(sidebar), main)
    } else {
        (None, area)
    };

    let [subject, transcript_outer, composer, status] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SUBJECT_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(composer_height),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .areas(main);

    let transcript = Rect::new(
        transcript_outer.x + TRANSCRIPT_MARGIN,
        transcript_outer.y,
        transcript_outer.width.saturating_sub(TRANSCRIPT_MARGIN * 2),
        transcript_outer.height,
    );
    let directory_list = sidebar.map(|s| {
        Rect::new(
            s.x + 1,
            s.y + 1,
            s.width.saturating_sub(2),
            s.height.saturating_sub(2),
        )
    });

    AppLayout {
        sidebar,
        directory_list,
        subject,
        transcript,
        composer,
        status,
    }
}

pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;
    let layout = compute_layout(area, state.show_sidebar, state.composer.height());

    if let Some(sidebar) = layout.sidebar {
        directory::render_directory(
            frame,
            sidebar,
            &state.directory,
            state.session.active_conversation_id(),
            state.focus == Focus::Directory,
        );
    }

    let active_label = state.active_label();
    composer::render_subject_bar(
        frame,
        layout.subject,
        &state.composer,
        active_label.as_deref(),
        state.focus == Focus::Subject,
    );
    transcript::render_transcript(
        frame,
        layout.transcript,
        &state.transcript,
        state.show_welcome(),
        state.spinner_frame,
    );
    composer::render_composer(
        frame,
        layout.composer,
        &state.composer,
        state.focus == Focus::Composer && app.overlay.is_none(),
        state.session.is_sending(),
    );
    render_status_line(frame, layout.status, state);

    app.overlay.render(frame, area);
}

fn render_status_line(frame: &mut Frame, area: Rect, state: &TuiState) {
    let dim = Style::default().fg(Color::DarkGray);
    let width = area.width as usize;

    let line = if let Some(notice) = &state.status {
        let color = match notice.level {
            StatusLevel::Info => Color::Green,
            StatusLevel::Warn => Color::Yellow,
        };
        Line::from(Span::styled(
            truncate_with_ellipsis(&notice.text, width),
            Style::default().fg(color),
        ))
    } else {
        let account = if state.signed_in {
            "signed in"
        } else {
            "signed out"
        };
        let text = format!(
            " {} · {account} · Ctrl+N new · Ctrl+F search · Tab focus · Ctrl+C quit",
            state.server_label
        );
        Line::from(Span::styled(truncate_with_ellipsis(&text, width), dim))
    };

    frame.render_widget(Paragraph::new(line), area);
}
