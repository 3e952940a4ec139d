//! Assistant pane widget: paired transcript of the held session record.

use super::app::{Focus, SPINNER, TuiApp, render_input_box};
use super::text::wrap_text;
use super::theme::THEME;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const BLURB: &[&str] = &[
    "Your Personal Context-Aware",
    "Smart AI Sales Chat Assistant",
    "",
    "I analyze your conversations in real-time and provide smart suggestions, \
     triggers, and insights to help you close deals faster.",
];

pub fn render(app: &TuiApp, frame: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Assistant;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused {
            THEME.border_focused
        } else {
            THEME.border
        }))
        .title(Span::styled(
            " ConvoSphere · Smart Assist ",
            Style::default()
                .fg(THEME.assistant_label)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).split(inner);
    render_transcript(app, frame, rows[0]);

    let pane = app.console.assistant();
    render_input_box(
        frame,
        rows[1],
        " Ask ",
        &pane.input,
        "Ask ConvoSphere for help...",
        app.shows_cursor(Focus::Assistant),
        pane.is_sending(),
    );
}

fn render_transcript(app: &TuiApp, frame: &mut Frame<'_>, area: Rect) {
    let mut lines: Vec<Line<'_>> = Vec::new();
    if app.console.is_loading() {
        let spinner = SPINNER[(app.spinner_tick as usize) % SPINNER.len()];
        lines.push(Line::from(Span::styled(
            format!(" {spinner} Loading chat..."),
            Style::default().fg(THEME.status_spinner),
        )));
    }

    let turns = app.console.transcript();
    if turns.is_empty() {
        let mut body = lines;
        body.push(Line::from(""));
        for (idx, text) in BLURB.iter().enumerate() {
            let style = if idx < 2 {
                Style::default()
                    .fg(THEME.accent_bright)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(THEME.fg_dim)
            };
            body.push(Line::from(Span::styled(*text, style)));
        }
        frame.render_widget(
            Paragraph::new(body)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
        return;
    }

    lines.push(Line::from(Span::styled(
        " Conversation History",
        Style::default().fg(THEME.fg_muted),
    )));
    lines.push(Line::from(""));

    let width = area.width.saturating_sub(2) as usize;
    for turn in &turns {
        push_turn(&mut lines, "You", &turn.user, THEME.local_label, Alignment::Right, width);
        push_turn(
            &mut lines,
            "ConvoSphere",
            &turn.reply,
            THEME.assistant_label,
            Alignment::Left,
            width,
        );
    }

    let total = lines.len() as u16;
    let max_scroll = total.saturating_sub(area.height);
    let scroll = max_scroll.saturating_sub(app.assistant_scroll.min(max_scroll));
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);
}

fn push_turn(
    lines: &mut Vec<Line<'_>>,
    label: &'static str,
    text: &str,
    color: ratatui::style::Color,
    alignment: Alignment,
    width: usize,
) {
    lines.push(
        Line::from(Span::styled(
            format!(" {label} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(alignment),
    );
    for body in wrap_text(text, width) {
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
    use proto::{SessionId, SessionRecord};
    use tokio::sync::mpsc;

    fn make_app(record: SessionRecord) -> (TuiApp, mpsc::Receiver<ConsoleEvent>) {
        let settings = ConsoleSettings {
            poll_interval: Duration::from_secs(3600),
            ..ConsoleSettings::default()
        };
        let api = StubApi {
            record,
            ..StubApi::default()
        };
        let (console, rx) = Console::new(Arc::new(api), settings);
        (TuiApp::new(console, "http://localhost:8000"), rx)
    }

    async fn pump(app: &mut TuiApp, rx: &mut mpsc::Receiver<ConsoleEvent>) {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for console event")
            .expect("event channel closed");
        app.apply_event(event);
    }

    fn draw(app: &TuiApp) -> String {
        render_to_text(70, 24, |frame| render(app, frame, frame.area()))
    }

    #[test]
    fn empty_transcript_shows_blurb_and_placeholder() {
        let (app, _rx) = make_app(SessionRecord::default());
        let screen = draw(&app);
        assert!(screen.contains("Smart AI Sales Chat Assistant"));
        assert!(screen.contains("Ask ConvoSphere for help..."));
        assert!(!screen.contains("Loading chat..."));
    }

    #[tokio::test]
    async fn loading_indicator_shows_until_record_arrives() {
        let record = SessionRecord {
            past: vec!["any upsell ideas?".to_string()],
            generated: vec!["offer the annual plan".to_string()],
            ..SessionRecord::default()
        };
        let (mut app, mut rx) = make_app(record);
        app.console.select(SessionId::from("s"));
        assert!(draw(&app).contains("Loading chat..."));

        pump(&mut app, &mut rx).await;
        let screen = draw(&app);
        assert!(!screen.contains("Loading chat..."));
        assert!(screen.contains("Conversation History"));
        assert!(screen.contains("any upsell ideas?"));
        assert!(screen.contains("offer the annual plan"));
    }

    #[tokio::test]
    async fn reply_replaces_rendered_transcript() {
        let (mut app, mut rx) = make_app(SessionRecord::default());
        app.console.select(SessionId::from("s"));
        pump(&mut app, &mut rx).await;

        app.focus = Focus::Assistant;
        app.console.assistant_mut().input = "hello".to_string();
        assert!(app.console.submit_assistant().expect("dispatched"));
        assert!(draw(&app).contains("Sending..."));

        pump(&mut app, &mut rx).await;
        let screen = draw(&app);
        assert!(screen.contains("re: hello"));
        assert!(app.console.assistant().input.is_empty());
    }

    #[test]
    fn turn_with_missing_reply_still_renders_both_labels() {
        let mut lines = Vec::new();
        push_turn(&mut lines, "You", "q", THEME.local_label, Alignment::Right, 20);
        push_turn(&mut lines, "ConvoSphere", "", THEME.assistant_label, Alignment::Left, 20);
        // label, body, spacer for each turn half
        assert_eq!(lines.len(), 6);
    }
}
