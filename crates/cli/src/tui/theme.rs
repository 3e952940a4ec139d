//! Centralized TUI theme built on ratatui's Tailwind CSS palette.

use ratatui::style::Color;
use ratatui::style::palette::tailwind;

/// The console theme. Every visual token lives here.
pub struct Theme {
    // ── Base ──
    /// Primary foreground/text color.
    pub fg: Color,
    /// Dimmed foreground for less prominent text.
    pub fg_dim: Color,
    /// Muted foreground for minimal-emphasis elements.
    pub fg_muted: Color,
    /// Default border color for panels and widgets.
    pub border: Color,
    /// Border color for the focused widget.
    pub border_focused: Color,

    // ── Accent / Brand ──
    /// Primary accent/brand color.
    pub accent: Color,
    /// Bright accent for high-emphasis elements.
    pub accent_bright: Color,

    // ── Semantic ──
    /// Color for success indicators.
    pub success: Color,
    /// Color for warning indicators.
    pub warning: Color,
    /// Color for error indicators.
    pub error: Color,

    // ── Chat roles ──
    /// Sender label for messages typed in this console.
    pub local_label: Color,
    /// Sender label for messages relayed from the client's channel.
    pub remote_label: Color,
    /// Label color for assistant replies.
    pub assistant_label: Color,
    /// Message timestamp color.
    pub timestamp: Color,

    // ── Status bar ──
    /// Backend origin color in the status bar.
    pub status_backend: Color,
    /// Spinner animation color in the status bar.
    pub status_spinner: Color,
    /// Hint/keybinding text color in the status bar.
    pub status_hint: Color,

    // ── Sidebar ──
    /// Indicator mark for the selected session entry.
    pub sidebar_active_indicator: Color,
    /// Highlight for the list cursor.
    pub sidebar_hover: Color,
    /// Session label color in the sidebar.
    pub sidebar_text: Color,
    /// Field labels in the create form.
    pub form_label: Color,

    // ── Alert ──
    /// Border of the blocking warning overlay.
    pub alert_border: Color,
}

impl Theme {
    /// The default dark theme using Tailwind palette.
    pub const fn default_dark() -> Self {
        Self {
            // Base
            fg: tailwind::SLATE.c100,
            fg_dim: tailwind::SLATE.c400,
            fg_muted: tailwind::SLATE.c500,
            border: tailwind::SLATE.c700,
            border_focused: tailwind::INDIGO.c400,

            // Accent
            accent: tailwind::INDIGO.c500,
            accent_bright: tailwind::INDIGO.c300,

            // Semantic
            success: tailwind::EMERALD.c500,
            warning: tailwind::AMBER.c500,
            error: tailwind::RED.c500,

            // Chat
            local_label: tailwind::CYAN.c400,
            remote_label: tailwind::SKY.c300,
            assistant_label: tailwind::INDIGO.c300,
            timestamp: tailwind::SLATE.c500,

            // Status bar
            status_backend: tailwind::SKY.c400,
            status_spinner: tailwind::AMBER.c400,
            status_hint: tailwind::SLATE.c500,

            // Sidebar
            sidebar_active_indicator: tailwind::CYAN.c400,
            sidebar_hover: tailwind::SLATE.c600,
            sidebar_text: tailwind::SLATE.c300,
            form_label: tailwind::SLATE.c400,

            // Alert
            alert_border: tailwind::AMBER.c400,
        }
    }
}

/// Global theme instance.
pub const THEME: Theme = Theme::default_dark();
