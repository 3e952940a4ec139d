//! Full-screen ratatui console: session sidebar, channel pane, assistant pane.

pub mod app;
mod assistant;
mod channel;
pub mod event;
mod sidebar;
mod text;
mod theme;

pub use event::run_tui;
