use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading/validation error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend request error.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Console interaction error.
    #[error("Console error: {0}")]
    Console(#[from] ConsoleError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A field has an invalid value and reason.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Filesystem read error.
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(String),
}

/// Backend transport errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("Request failed {status}: {body}")]
    Request { status: u16, body: String },

    /// Network/connection-level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not the expected JSON shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request URL could not be built from the base origin.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// Returns the HTTP status for `Request` failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Which of the two chat panes an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// External messaging channel pane.
    Channel,
    /// AI assistant pane.
    Assistant,
}

impl std::fmt::Display for Pane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pane::Channel => write!(f, "channel"),
            Pane::Assistant => write!(f, "assistant"),
        }
    }
}

/// Console interaction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// A send was attempted before any session was selected.
    #[error("{}", no_session_warning(.0))]
    NoActiveSession(Pane),

    /// A backend call behind a console operation failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ConsoleError {
    /// Returns `true` for errors that must be shown as a blocking warning.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::NoActiveSession(_))
    }
}

fn no_session_warning(pane: &Pane) -> &'static str {
    match pane {
        Pane::Channel => "Start or select a chat session from the left before sending.",
        Pane::Assistant => {
            "Start or select a chat session from the left before chatting with ConvoSphere."
        }
    }
}
