use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::{AFFORDANCE_WIDTH, DirectoryState, DirectoryView};
use crate::common::truncate_with_ellipsis;

/// Draws the directory block. `list_area` must be the block's inner area as
/// computed by the layout pass, so clicks map to the rows drawn here.
pub fn render_directory(
    frame: &mut Frame,
    area: Rect,
    dir: &DirectoryState,
    active_id: Option<&str>,
    focused: bool,
) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let title = match dir.view {
        DirectoryView::Loading => " Conversations … ",
        _ => " Conversations ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dim = Style::default().fg(Color::DarkGray);
    match &dir.view {
        DirectoryView::SignedOut => {
            let lines = vec![
                Line::from("Sign in to see your conversations."),
                Line::from(""),
                Line::from(Span::styled("Run `parley login` in a shell.", dim)),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
            return;
        }
        DirectoryView::Failed(error) => {
            let lines = vec![
                Line::from(Span::styled(
                    "Could not load conversations",
                    Style::default().fg(Color::Red),
                )),
                Line::from(Span::styled(error.clone(), dim)),
                Line::from(""),
                Line::from(Span::styled("Ctrl+R to retry", dim)),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
            return;
        }
        DirectoryView::Loading if dir.rows().is_empty() => {
            frame.render_widget(Paragraph::new(Span::styled("Loading…", dim)), inner);
            return;
        }
        DirectoryView::Ready if dir.rows().is_empty() => {
            frame.render_widget(
                Paragraph::new(Span::styled("No conversations yet.", dim)),
                inner,
            );
            return;
        }
        DirectoryView::Loading | DirectoryView::Ready => {}
    }

    let width = inner.width as usize;
    let label_width = width.saturating_sub(2 + (AFFORDANCE_WIDTH as usize) * 2);
    let mut lines = Vec::with_capacity(inner.height as usize);

    for (idx, row) in dir
        .rows()
        .iter()
        .enumerate()
        .skip(dir.scroll_offset)
        .take(inner.height as usize)
    {
        let is_active = active_id == Some(row.id.as_str());
        let is_selected = idx == dir.selected;

        if let Some(editor) = dir
            .editor
            .as_ref()
            .filter(|e| e.conversation_id == row.id)
        {
            let text = truncate_with_ellipsis(&editor.input, width.saturating_sub(3));
            lines.push(Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Yellow)),
                Span::styled(text, Style::default().fg(Color::Yellow)),
                Span::styled("█", Style::default().fg(Color::Yellow)),
            ]));
            continue;
        }

        let marker = if is_active { "● " } else { "  " };
        let label = truncate_with_ellipsis(&row.display_label(), label_width);
        let padding = " ".repeat(label_width.saturating_sub(unicode_width::UnicodeWidthStr::width(
            label.as_str(),
        )));

        let mut label_style = Style::default();
        if is_active {
            label_style = label_style.fg(Color::Green).add_modifier(Modifier::BOLD);
        }
        if is_selected {
            label_style = if focused {
                label_style.add_modifier(Modifier::REVERSED)
            } else {
                label_style.add_modifier(Modifier::UNDERLINED)
            };
        }

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Green)),
            Span::styled(format!("{label}{padding}"), label_style),
            Span::styled(" ✎ ", dim),
            Span::styled(" ✕ ", Style::default().fg(Color::Red)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
