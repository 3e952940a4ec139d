//! Channel pane widget: relayed client messages plus the outbound input.

use super::app::{Focus, TuiApp, render_input_box};
use super::text::wrap_text;
use super::theme::THEME;
use proto::ChannelMessage;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render(app: &TuiApp, frame: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Channel;
    let title = match app.selected_label() {
        Some(label) => format!(" Client Chat · {label} "),
        None => " Client Chat ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused {
            THEME.border_focused
        } else {
            THEME.border
        }))
        .title(Span::styled(
            title,
            Style::default()
                .fg(THEME.remote_label)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).split(inner);
    render_messages(app, frame, rows[0]);

    let pane = app.console.channel();
    render_input_box(
        frame,
        rows[1],
        " Message ",
        &pane.input,
        "type to chat to client:",
        app.shows_cursor(Focus::Channel),
        pane.is_sending(),
    );
}

fn render_messages(app: &TuiApp, frame: &mut Frame<'_>, area: Rect) {
    let pane = app.console.channel();
    if pane.session().is_none() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                " Select a chat session to see client messages.",
                Style::default().fg(THEME.fg_muted),
            )),
            area,
        );
        return;
    }
    if pane.messages().is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                " No messages yet. Start chatting below.",
                Style::default().fg(THEME.fg_muted),
            )),
            area,
        );
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line<'_>> = Vec::new();
    for message in pane.messages() {
        push_message(&mut lines, message, width);
    }

    let total = lines.len() as u16;
    let max_scroll = total.saturating_sub(area.height);
    let scroll = max_scroll.saturating_sub(app.channel_scroll.min(max_scroll));
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);
}

/// Header (sender, local time) then wrapped body; local messages hug the right edge.
fn push_message(lines: &mut Vec<Line<'_>>, message: &ChannelMessage, width: usize) {
    let local = message.is_local();
    let (label_color, alignment) = if local {
        (THEME.local_label, Alignment::Right)
    } else {
        (THEME.remote_label, Alignment::Left)
    };

    lines.push(
        Line::from(vec![
            Span::styled(
                format!(" {}", message.sender_label()),
                Style::default()
                    .fg(label_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} ", message.clock_time()),
                Style::default().fg(THEME.timestamp),
            ),
        ])
        .alignment(alignment),
    );
    for body in wrap_text(&message.text, width) {
        lines.push(
            Line::from(Span::styled(
                format!(" {body} "),
                Style::default().fg(THEME.fg),
            ))
            .alignment(alignment),
        );
    }
    lines.push(Line::from(""));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::test_support::{StubApi, render_to_text};
    use console::{Console, ConsoleEvent, ConsoleSettings};
    use proto::SessionId;

    fn make_app() -> TuiApp {
        let settings = ConsoleSettings {
            poll_interval: Duration::from_secs(3600),
            ..ConsoleSettings::default()
        };
        let (console, _rx) = Console::new(Arc::new(StubApi::default()), settings);
        TuiApp::new(console, "http://localhost:8000")
    }

    fn remote(text: &str) -> ChannelMessage {
        ChannelMessage {
            sender: "Telegram".to_string(),
            text: text.to_string(),
            timestamp: 1_700_000_000.0,
        }
    }

    fn draw(app: &TuiApp) -> String {
        render_to_text(60, 20, |frame| render(app, frame, frame.area()))
    }

    #[test]
    fn without_session_shows_select_hint_and_placeholder() {
        let app = make_app();
        let screen = draw(&app);
        assert!(screen.contains("Client Chat"));
        assert!(screen.contains("Select a chat session"));
        assert!(screen.contains("type to chat to client:"));
    }

    #[tokio::test]
    async fn attached_empty_pane_invites_first_message() {
        let mut app = make_app();
        app.console.select(SessionId::from("s"));
        let screen = draw(&app);
        assert!(screen.contains("No messages yet. Start chatting below."));
    }

    #[tokio::test]
    async fn local_messages_are_right_aligned() {
        let mut app = make_app();
        let id = SessionId::from("s");
        app.console.select(id.clone());
        app.apply_event(ConsoleEvent::ChannelPolled {
            session: id,
            messages: vec![remote("price?"), ChannelMessage::local("ten dollars")],
        });

        let screen = draw(&app);
        let remote_row = screen
            .lines()
            .find(|l| l.contains("price?"))
            .expect("remote row");
        let local_row = screen
            .lines()
            .find(|l| l.contains("ten dollars"))
            .expect("local row");
        assert!(screen.contains("Telegram"));
        assert!(screen.contains("You"));
        let remote_col = remote_row.find("price?").expect("col");
        let local_col = local_row.find("ten dollars").expect("col");
        assert!(local_col > remote_col + 20);
    }

    #[test]
    fn wrapped_body_adds_one_line_per_chunk() {
        let mut lines = Vec::new();
        push_message(&mut lines, &remote("one two three four"), 9);
        // header, "one two", "three", "four", spacer
        assert_eq!(lines.len(), 5);
    }
}
