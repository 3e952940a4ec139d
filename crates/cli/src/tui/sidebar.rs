//! Sidebar: create-session form above the session list.

use super::app::{Focus, FormField, TuiApp};
use super::text::{tail_str, truncate_str};
use super::theme::THEME;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// Fixed sidebar width in terminal columns.
pub const SIDEBAR_WIDTH: u16 = 32;

/// Form height: borders, two rows per field, and the submit row.
const FORM_HEIGHT: u16 = 2 + 2 * FormField::ALL.len() as u16 + 1;

/// Rows per session entry in the list.
const ENTRY_HEIGHT: u16 = 2;

pub fn render(app: &TuiApp, frame: &mut Frame<'_>, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(FORM_HEIGHT), Constraint::Min(3)]).split(area);
    render_form(app, frame, rows[0]);
    render_list(app, frame, rows[1]);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(THEME.border_focused)
    } else {
        Style::default().fg(THEME.border)
    }
}

fn render_form(app: &TuiApp, frame: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Form;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(Span::styled(
            " Session Setup ",
            Style::default()
                .fg(THEME.accent_bright)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let room = inner.width.saturating_sub(3) as usize;
    let mut lines: Vec<Line<'_>> = Vec::new();
    let mut cursor = None;

    for field in FormField::ALL {
        let active = focused && app.form.field == field;
        let marker = if active { "▸ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(THEME.accent_bright)),
            Span::styled(field.label(), Style::default().fg(THEME.form_label)),
        ]));

        let value = app.form.value(field);
        if value.is_empty() && !active {
            lines.push(Line::from(Span::styled(
                "  -",
                Style::default().fg(THEME.fg_muted),
            )));
        } else {
            let shown = tail_str(value, room);
            if active {
                cursor = Some((
                    inner.x + 2 + shown.width() as u16,
                    inner.y + lines.len() as u16,
                ));
            }
            lines.push(Line::from(Span::styled(
                format!("  {shown}"),
                Style::default().fg(THEME.fg),
            )));
        }
    }

    let (button, button_style) = if app.console.is_creating() {
        ("[ Creating... ]", Style::default().fg(THEME.fg_muted))
    } else if focused && app.form.field == FormField::Details {
        (
            "[ Start Chat ]",
            Style::default()
                .fg(THEME.accent_bright)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("[ Start Chat ]", Style::default().fg(THEME.fg_dim))
    };
    lines.push(Line::from(Span::styled(button, button_style)).alignment(Alignment::Center));

    frame.render_widget(Paragraph::new(lines), inner);

    if app.shows_cursor(Focus::Form)
        && let Some((x, y)) = cursor
        && y < inner.bottom()
        && x < inner.right()
    {
        frame.set_cursor_position((x, y));
    }
}

fn render_list(app: &TuiApp, frame: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Sessions;
    let directory = app.console.directory();
    let focus_hint = if focused {
        Span::styled(" ◉", Style::default().fg(THEME.sidebar_active_indicator))
    } else {
        Span::styled(" [Tab]", Style::default().fg(THEME.fg_muted))
    };
    let header = Line::from(vec![
        Span::styled(
            " Chat Sessions ",
            Style::default()
                .fg(THEME.sidebar_active_indicator)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("({})", directory.len()),
            Style::default().fg(THEME.fg_muted),
        ),
        focus_hint,
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(header);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if directory.is_empty() {
        let empty_msg = Paragraph::new(Line::from(Span::styled(
            " No chats yet. Create one above.",
            Style::default().fg(THEME.fg_muted),
        )))
        .wrap(Wrap { trim: false });
        frame.render_widget(empty_msg, inner);
        return;
    }

    let max_name_width = inner.width.saturating_sub(2) as usize;
    let cursor = app.sidebar_cursor.min(directory.len() - 1);
    let selected = app.console.selected();
    let mut lines: Vec<Line<'_>> = Vec::new();

    for (idx, entry) in directory.iter().enumerate() {
        let is_active = Some(&entry.id) == selected;
        let is_hovered = focused && idx == cursor;

        let indicator = if is_active {
            Span::styled("▌", Style::default().fg(THEME.sidebar_active_indicator))
        } else if is_hovered {
            Span::styled("▌", Style::default().fg(THEME.sidebar_hover))
        } else {
            Span::raw(" ")
        };

        let name_style = if is_active {
            Style::default().fg(THEME.fg).add_modifier(Modifier::BOLD)
        } else if is_hovered {
            Style::default()
                .fg(THEME.fg)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(THEME.sidebar_text)
        };
        let name = truncate_str(entry.label(), max_name_width.saturating_sub(1));
        lines.push(Line::from(vec![
            indicator,
            Span::styled(format!(" {name}"), name_style),
        ]));

        let meta = &entry.metadata;
        let detail = meta
            .start_timestamp
            .as_deref()
            .or(meta.client_phone.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(entry.id.as_str());
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                truncate_str(detail, max_name_width.saturating_sub(1)),
                Style::default().fg(THEME.fg_muted),
            ),
        ]));
    }

    // Keep the cursor row in view.
    let cursor_bottom = (cursor as u16 + 1) * ENTRY_HEIGHT;
    let scroll = cursor_bottom.saturating_sub(inner.height);

    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}
