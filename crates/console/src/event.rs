//! Results reported back to the console by background tasks.

use proto::{
    AssistantReply, BackendError, ChannelMessage, ChannelSendAck, SessionEnvelope, SessionId,
    SessionRecord, SessionSummary,
};

/// Identifies one selection-driven record fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Monotonic per-console sequence number.
    pub seq: u64,
    /// Session the fetch was issued for.
    pub session: SessionId,
}

/// A send that has been dispatched and not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    /// Session the text was sent to.
    pub session: SessionId,
    /// Trimmed text as sent.
    pub text: String,
}

/// Completion of a background backend call.
#[derive(Debug)]
pub enum ConsoleEvent {
    /// Initial directory load finished.
    DirectoryLoaded(Result<Vec<SessionSummary>, BackendError>),
    /// Create-session call finished.
    SessionCreated(Result<SessionEnvelope, BackendError>),
    /// Record fetch for a selection finished.
    RecordFetched {
        ticket: FetchTicket,
        result: Result<SessionRecord, BackendError>,
    },
    /// A poll tick returned new channel messages.
    ChannelPolled {
        session: SessionId,
        messages: Vec<ChannelMessage>,
    },
    /// Channel send finished.
    ChannelSent {
        pending: PendingSend,
        result: Result<ChannelSendAck, BackendError>,
    },
    /// Assistant send finished.
    AssistantReplied {
        pending: PendingSend,
        result: Result<AssistantReply, BackendError>,
    },
}

/// What applying an event changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Visible state changed.
    Updated,
    /// The event was stale or carried nothing new.
    Ignored,
    /// A new session was created and selected.
    SessionCreated(SessionId),
}
