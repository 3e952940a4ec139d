use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Sender label for messages authored in this console.
pub const LOCAL_SENDER: &str = "You";

/// Opaque backend identifier for a chat session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Returns the raw session identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One message shown in the channel pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// `"You"` for local messages, otherwise the remote party's name.
    #[serde(default)]
    pub sender: String,
    /// Message body.
    #[serde(default)]
    pub text: String,
    /// Seconds since the Unix epoch (fractional).
    #[serde(default)]
    pub timestamp: f64,
}

impl ChannelMessage {
    /// Builds a locally authored message stamped with the current time.
    pub fn local(text: impl Into<String>) -> Self {
        Self::local_at(text, Utc::now())
    }

    /// Builds a locally authored message stamped with `at`.
    pub fn local_at(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            sender: LOCAL_SENDER.to_string(),
            text: text.into(),
            timestamp: at.timestamp_millis() as f64 / 1000.0,
        }
    }

    /// Returns `true` when this console authored the message.
    pub fn is_local(&self) -> bool {
        self.sender == LOCAL_SENDER
    }

    /// Header label; an anonymous remote sender is shown as `Client`.
    pub fn sender_label(&self) -> &str {
        if !self.sender.is_empty() {
            &self.sender
        } else if self.is_local() {
            LOCAL_SENDER
        } else {
            "Client"
        }
    }

    /// Timestamp as a UTC datetime, if representable.
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        let millis = (self.timestamp * 1000.0).round() as i64;
        Utc.timestamp_millis_opt(millis).single()
    }

    /// Local wall-clock `HH:MM` for display; empty when the timestamp is unusable.
    pub fn clock_time(&self) -> String {
        self.sent_at()
            .map(|at| at.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_default()
    }
}
