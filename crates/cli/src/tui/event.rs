//! Async event loop for the TUI: interleaves terminal input, console results and spinner ticks.

use std::sync::Arc;

use anyhow::Context;
use backend::ConsoleApi;
use console::{Console, ConsoleSettings};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use super::app::TuiApp;

/// Restores the terminal on drop, including on early `?` returns and panics.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    }
}

/// Run the full-screen console until the user quits.
pub async fn run_tui(
    api: Arc<dyn ConsoleApi>,
    settings: ConsoleSettings,
    api_base: String,
) -> anyhow::Result<()> {
    // Terminal setup
    enable_raw_mode().context("failed to enable raw terminal mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let _guard = TerminalGuard; // Drop restores terminal

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    debug!(
        api_base = %api_base,
        poll_interval_ms = settings.poll_interval.as_millis() as u64,
        refetch_mode = %settings.refetch_mode,
        "TUI started"
    );

    let (console, mut console_rx) = Console::new(api, settings);
    let mut app = TuiApp::new(console, api_base);
    app.console.load_directory();

    // Crossterm event stream (async)
    let mut crossterm_stream = EventStream::new();

    // Spinner tick interval (100ms)
    let mut spinner_interval = tokio::time::interval(std::time::Duration::from_millis(100));
    spinner_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            maybe_event = crossterm_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.handle_key(key);
                    }
                    Some(Ok(Event::Mouse(mouse))) => app.handle_mouse(mouse.kind),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => warn!(error = %e, "Terminal event stream error"),
                    None => break,
                }
            }

            Some(event) = console_rx.recv() => {
                app.apply_event(event);
            }

            _ = spinner_interval.tick(), if app.is_busy() => {
                app.spinner_tick = app.spinner_tick.wrapping_add(1);
            }
        }

        if app.should_quit {
            break;
        }
    }

    debug!("TUI exiting");
    // TerminalGuard::drop handles cleanup
    Ok(())
}
