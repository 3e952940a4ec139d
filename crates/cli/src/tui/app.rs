//! TUI application state, rendering, and input handling.

use console::{Console, ConsoleEvent, Outcome};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use proto::{ConsoleError, CreateSessionRequest, SessionId};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use super::text::tail_str;
use super::theme::THEME;
use super::{assistant, channel, sidebar};

/// Spinner animation frames (Braille pattern).
pub(super) const SPINNER: &[char] = &['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

/// Lines moved per PageUp/PageDown.
const SCROLL_PAGE: u16 = 10;

// ─── Data types ──────────────────────────────────────────────

/// Which widget receives key input. Tab cycles in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Session list in the sidebar.
    Sessions,
    /// Create-session form in the sidebar.
    Form,
    /// Channel pane input.
    Channel,
    /// Assistant pane input.
    Assistant,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Sessions => Focus::Form,
            Focus::Form => Focus::Channel,
            Focus::Channel => Focus::Assistant,
            Focus::Assistant => Focus::Sessions,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Sessions => Focus::Assistant,
            Focus::Form => Focus::Sessions,
            Focus::Channel => Focus::Form,
            Focus::Assistant => Focus::Channel,
        }
    }
}

/// Fields of the create-session form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Phone,
    Name,
    Details,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Phone, FormField::Name, FormField::Details];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Phone => "Client Phone",
            FormField::Name => "Client Name",
            FormField::Details => "Client Details",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            FormField::Phone => Some(FormField::Name),
            FormField::Name => Some(FormField::Details),
            FormField::Details => None,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Phone | FormField::Name => FormField::Phone,
            FormField::Details => FormField::Name,
        }
    }
}

/// Draft values of the create-session form.
#[derive(Debug, Default)]
pub struct CreateForm {
    pub phone: String,
    pub name: String,
    pub details: String,
    /// Field receiving typed characters.
    pub field: FormField,
}

impl CreateForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Phone => &self.phone,
            FormField::Name => &self.name,
            FormField::Details => &self.details,
        }
    }

    fn current_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Phone => &mut self.phone,
            FormField::Name => &mut self.name,
            FormField::Details => &mut self.details,
        }
    }

    /// Request body with the fields exactly as typed, empty ones included.
    pub fn request(&self) -> CreateSessionRequest {
        CreateSessionRequest {
            client_phone: self.phone.clone(),
            client_name: self.name.clone(),
            client_details: self.details.clone(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One-line message shown in the status bar until the next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

// ─── TuiApp ──────────────────────────────────────────────────

/// Full state for the console screen.
pub struct TuiApp {
    /// Session synchronization core.
    pub console: Console,
    /// Widget receiving key input.
    pub focus: Focus,
    /// Create-session form drafts.
    pub form: CreateForm,
    /// Highlighted row in the session list.
    pub sidebar_cursor: usize,
    /// Blocking warning; any key dismisses it.
    pub alert: Option<String>,
    /// Last error or notice for the status bar.
    pub status: Option<StatusMessage>,
    /// Spinner animation frame counter.
    pub spinner_tick: u64,
    /// Channel pane scroll, in lines up from the newest message.
    pub channel_scroll: u16,
    /// Assistant pane scroll, in lines up from the newest turn.
    pub assistant_scroll: u16,
    /// Set when the user asked to exit.
    pub should_quit: bool,
    api_base: String,
}

impl TuiApp {
    pub fn new(console: Console, api_base: impl Into<String>) -> Self {
        Self {
            console,
            focus: Focus::Sessions,
            form: CreateForm::default(),
            sidebar_cursor: 0,
            alert: None,
            status: None,
            spinner_tick: 0,
            channel_scroll: 0,
            assistant_scroll: 0,
            should_quit: false,
            api_base: api_base.into(),
        }
    }

    /// `true` while any backend call the user is waiting on is outstanding.
    pub fn is_busy(&self) -> bool {
        self.activity().is_some()
    }

    fn activity(&self) -> Option<&'static str> {
        if self.console.is_creating() {
            Some("Creating...")
        } else if self.console.is_loading() {
            Some("Loading chat...")
        } else if self.console.channel().is_sending() {
            Some("Sending to client...")
        } else if self.console.assistant().is_sending() {
            Some("ConvoSphere is thinking...")
        } else {
            None
        }
    }

    /// Sidebar label of the selected session, or its raw id.
    pub fn selected_label(&self) -> Option<String> {
        let id = self.console.selected()?;
        Some(
            self.console
                .directory()
                .get(id)
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| id.to_string()),
        )
    }

    /// Whether the terminal cursor belongs to the widget with `focus`.
    pub fn shows_cursor(&self, focus: Focus) -> bool {
        self.focus == focus && self.alert.is_none()
    }

    // ── Input handling ───────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.alert.take().is_some() {
            return;
        }
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => {
                self.should_quit = true;
            }
            (_, KeyCode::Tab) => self.focus = self.focus.next(),
            (_, KeyCode::BackTab) => self.focus = self.focus.prev(),
            _ => match self.focus {
                Focus::Sessions => self.handle_list_key(key.code),
                Focus::Form => self.handle_form_key(key),
                Focus::Channel | Focus::Assistant => self.handle_input_key(key),
            },
        }
    }

    pub fn handle_mouse(&mut self, kind: MouseEventKind) {
        match kind {
            MouseEventKind::ScrollUp => self.scroll_up(3),
            MouseEventKind::ScrollDown => self.scroll_down(3),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        let len = self.console.directory().len();
        match code {
            KeyCode::Up => self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1),
            KeyCode::Down if len > 0 => {
                self.sidebar_cursor = (self.sidebar_cursor + 1).min(len - 1);
            }
            KeyCode::Home => self.sidebar_cursor = 0,
            KeyCode::End => self.sidebar_cursor = len.saturating_sub(1),
            KeyCode::Enter => {
                let picked = self
                    .console
                    .directory()
                    .at(self.sidebar_cursor)
                    .map(|s| s.id.clone());
                if let Some(id) = picked {
                    self.select(id);
                }
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
                self.form.current_mut().push(c);
            }
            (_, KeyCode::Backspace) => {
                self.form.current_mut().pop();
            }
            (_, KeyCode::Up) => self.form.field = self.form.field.prev(),
            (_, KeyCode::Down) => {
                if let Some(next) = self.form.field.next() {
                    self.form.field = next;
                }
            }
            (_, KeyCode::Enter) => match self.form.field.next() {
                Some(next) => self.form.field = next,
                None => {
                    if self.console.create_session(self.form.request()) {
                        self.status = None;
                    }
                }
            },
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
                if let Some(input) = self.focused_input_mut() {
                    input.push(c);
                }
            }
            (_, KeyCode::Backspace) => {
                if let Some(input) = self.focused_input_mut() {
                    input.pop();
                }
            }
            (_, KeyCode::Enter) => self.submit_focused(),
            (_, KeyCode::Up) => self.scroll_up(1),
            (_, KeyCode::Down) => self.scroll_down(1),
            (_, KeyCode::PageUp) => self.scroll_up(SCROLL_PAGE),
            (_, KeyCode::PageDown) => self.scroll_down(SCROLL_PAGE),
            _ => {}
        }
    }

    fn focused_input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Channel => Some(&mut self.console.channel_mut().input),
            Focus::Assistant => Some(&mut self.console.assistant_mut().input),
            Focus::Sessions | Focus::Form => None,
        }
    }

    fn focused_scroll_mut(&mut self) -> Option<&mut u16> {
        match self.focus {
            Focus::Channel => Some(&mut self.channel_scroll),
            Focus::Assistant => Some(&mut self.assistant_scroll),
            Focus::Sessions | Focus::Form => None,
        }
    }

    fn scroll_up(&mut self, lines: u16) {
        if let Some(scroll) = self.focused_scroll_mut() {
            *scroll = scroll.saturating_add(lines);
        }
    }

    fn scroll_down(&mut self, lines: u16) {
        if let Some(scroll) = self.focused_scroll_mut() {
            *scroll = scroll.saturating_sub(lines);
        }
    }

    fn submit_focused(&mut self) {
        let result = match self.focus {
            Focus::Channel => self.console.submit_channel(),
            Focus::Assistant => self.console.submit_assistant(),
            Focus::Sessions | Focus::Form => return,
        };
        match result {
            Ok(true) => {
                self.status = None;
                if let Some(scroll) = self.focused_scroll_mut() {
                    *scroll = 0;
                }
            }
            Ok(false) => {}
            Err(e) => self.report(e),
        }
    }

    fn select(&mut self, id: SessionId) {
        self.console.select(id);
        self.channel_scroll = 0;
        self.assistant_scroll = 0;
        self.status = None;
    }

    /// Applies one background result and surfaces any error it carried.
    pub fn apply_event(&mut self, event: ConsoleEvent) {
        match self.console.apply(event) {
            Ok(Outcome::SessionCreated(id)) => {
                self.form.clear();
                if let Some(idx) = self.console.directory().position(&id) {
                    self.sidebar_cursor = idx;
                }
                self.channel_scroll = 0;
                self.assistant_scroll = 0;
                self.status = Some(StatusMessage::info(format!("Started chat {id}")));
            }
            Ok(Outcome::Updated | Outcome::Ignored) => {}
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, err: ConsoleError) {
        debug!(error = %err, blocking = err.is_blocking(), "Console error surfaced");
        if err.is_blocking() {
            self.alert = Some(err.to_string());
        } else {
            self.status = Some(StatusMessage::error(err.to_string()));
        }
    }

    // ── Rendering ────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
        let cols = Layout::horizontal([
            Constraint::Length(sidebar::SIDEBAR_WIDTH),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ])
        .split(rows[0]);

        sidebar::render(self, frame, cols[0]);
        channel::render(self, frame, cols[1]);
        assistant::render(self, frame, cols[2]);
        self.render_status(frame, rows[1]);

        if let Some(text) = &self.alert {
            render_alert(frame, area, text);
        }
    }

    fn hint(&self) -> &'static str {
        match self.focus {
            Focus::Sessions => "↑↓:move  Enter:open  Tab:focus  Esc:quit",
            Focus::Form => "Enter:next field / start chat  ↑↓:field  Tab:focus",
            Focus::Channel | Focus::Assistant => "Enter:send  ↑↓:scroll  Tab:focus  Esc:quit",
        }
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let session = self
            .selected_label()
            .unwrap_or_else(|| "no session".to_string());
        let mut spans = vec![
            Span::styled(
                format!(" ● {} ", self.api_base),
                Style::default().fg(THEME.status_backend),
            ),
            Span::styled(format!("│ {session} │ "), Style::default().fg(THEME.fg_dim)),
        ];

        if let Some(activity) = self.activity() {
            let spinner = SPINNER[(self.spinner_tick as usize) % SPINNER.len()];
            spans.push(Span::styled(
                format!("{spinner} {activity}"),
                Style::default().fg(THEME.status_spinner),
            ));
        } else if let Some(status) = &self.status {
            let color = if status.is_error {
                THEME.error
            } else {
                THEME.success
            };
            spans.push(Span::styled(status.text.clone(), Style::default().fg(color)));
        } else {
            spans.push(Span::styled(
                self.hint(),
                Style::default().fg(THEME.status_hint),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Single-line bordered input with placeholder; places the cursor when focused.
pub(super) fn render_input_box(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    text: &str,
    placeholder: &str,
    focused: bool,
    sending: bool,
) {
    let border_color = if sending {
        THEME.fg_muted
    } else if focused {
        THEME.border_focused
    } else {
        THEME.border
    };
    let title = if sending { " Sending... " } else { title };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);
    let inner = block.inner(area);
    let room = inner.width.saturating_sub(1) as usize;

    let (shown, style) = if text.is_empty() {
        (placeholder, Style::default().fg(THEME.fg_muted))
    } else {
        (tail_str(text, room), Style::default().fg(THEME.fg))
    };
    frame.render_widget(Paragraph::new(Span::styled(shown, style)).block(block), area);

    if focused && inner.width > 0 && inner.height > 0 {
        let offset = if text.is_empty() { 0 } else { shown.width() };
        frame.set_cursor_position((inner.x + offset as u16, inner.y));
    }
}

fn render_alert(frame: &mut Frame<'_>, area: Rect, text: &str) {
    let width = 52.min(area.width);
    let height = 7.min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.alert_border))
        .title(Span::styled(
            " Heads up ",
            Style::default()
                .fg(THEME.warning)
                .add_modifier(Modifier::BOLD),
        ));
    let body = vec![
        Line::from(""),
        Line::from(Span::styled(text, Style::default().fg(THEME.fg))),
        Line::from(""),
        Line::from(Span::styled(
            "press any key",
            Style::default().fg(THEME.fg_muted),
        )),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(body)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup,
    );
}
