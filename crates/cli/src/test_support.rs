use std::sync::{Mutex, OnceLock};

use async_trait::async_trait;
use backend::ConsoleApi;
use proto::{
    AssistantReply, BackendError, ChannelMessage, ChannelSendAck, CreateSessionRequest,
    HealthStatus, SessionEnvelope, SessionId, SessionMetadata, SessionRecord, SessionSummary,
};
use ratatui::{Frame, Terminal, backend::TestBackend};

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Locks process environment mutation for the entire test body.
///
/// A panicking test poisons the lock; later tests still proceed.
pub(crate) fn with_locked_env<R>(run: impl FnOnce() -> R) -> R {
    let _guard = env_lock().lock().unwrap_or_else(|e| e.into_inner());
    run()
}

/// Set an environment variable in test contexts.
///
/// # Safety
/// These calls remain unsafe in this toolchain. Call sites should use
/// `with_locked_env` to avoid data races between parallel tests.
pub(crate) fn set_env_var(key: &str, value: &str) {
    // SAFETY: required for this toolchain's `std::env` API.
    unsafe {
        std::env::set_var(key, value);
    }
}

/// Remove an environment variable in test contexts.
///
/// # Safety
/// These calls remain unsafe in this toolchain. Call sites should use
/// `with_locked_env` to avoid data races between parallel tests.
pub(crate) fn remove_env_var(key: &str) {
    // SAFETY: required for this toolchain's `std::env` API.
    unsafe {
        std::env::remove_var(key);
    }
}

/// Draws once into an in-memory terminal and returns the screen as text,
/// one line per row.
pub(crate) fn render_to_text(width: u16, height: u16, draw: impl FnOnce(&mut Frame<'_>)) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
    terminal.draw(draw).expect("draw");
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

/// Backend fake that answers every call successfully with fixed data.
#[derive(Default)]
pub(crate) struct StubApi {
    pub(crate) sessions: Vec<SessionSummary>,
    pub(crate) record: SessionRecord,
}

pub(crate) fn named_summary(id: &str, name: &str) -> SessionSummary {
    SessionSummary {
        id: SessionId::from(id),
        metadata: SessionMetadata {
            client_name: Some(name.to_string()),
            ..SessionMetadata::default()
        },
    }
}

#[async_trait]
impl ConsoleApi for StubApi {
    async fn health(&self) -> Result<HealthStatus, BackendError> {
        Ok(HealthStatus {
            status: "ok".to_string(),
        })
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, BackendError> {
        Ok(self.sessions.clone())
    }

    async fn create_session(
        &self,
        req: CreateSessionRequest,
    ) -> Result<SessionEnvelope, BackendError> {
        let name = if req.client_name.is_empty() {
            "client".to_string()
        } else {
            req.client_name.clone()
        };
        Ok(SessionEnvelope {
            id: SessionId::from(format!("{name}_start_1")),
            chat: SessionRecord {
                metadata: SessionMetadata {
                    client_name: Some(name),
                    ..SessionMetadata::default()
                },
                ..SessionRecord::default()
            },
        })
    }

    async fn get_session(&self, id: &SessionId) -> Result<SessionEnvelope, BackendError> {
        Ok(SessionEnvelope {
            id: id.clone(),
            chat: self.record.clone(),
        })
    }

    async fn send_channel(
        &self,
        _id: &SessionId,
        _text: &str,
    ) -> Result<ChannelSendAck, BackendError> {
        Ok(ChannelSendAck { success: true })
    }

    async fn poll_channel(&self, _id: &SessionId) -> Result<Vec<ChannelMessage>, BackendError> {
        Ok(Vec::new())
    }

    async fn send_assistant(
        &self,
        _id: &SessionId,
        text: &str,
    ) -> Result<AssistantReply, BackendError> {
        let mut chat = self.record.clone();
        chat.past.push(text.to_string());
        chat.generated.push(format!("re: {text}"));
        Ok(AssistantReply {
            reply: format!("re: {text}"),
            chat,
        })
    }
}
