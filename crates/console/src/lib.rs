//! Session synchronization core of the ConvoSphere console.
//!
//! [`Console`] is the composition root: it owns the session directory, the
//! current selection and the held session record, and feeds the channel and
//! assistant panes. Network calls run in spawned tasks that report back as
//! [`ConsoleEvent`]s, which the owner applies one at a time with
//! [`Console::apply`].

pub mod assistant;
pub mod channel;
pub mod directory;
pub mod event;
pub mod root;
pub mod settings;
#[cfg(test)]
mod test_support;

/// Assistant pane state.
pub use assistant::AssistantPane;
/// Channel pane state and its polling task.
pub use channel::ChannelPane;
/// In-memory session directory.
pub use directory::SessionDirectory;
/// Events produced by background tasks.
pub use event::{ConsoleEvent, FetchTicket, Outcome, PendingSend};
/// Composition root.
pub use root::Console;
/// Runtime knobs for the console core.
pub use settings::{ConsoleSettings, DEFAULT_POLL_INTERVAL, RefetchMode};
