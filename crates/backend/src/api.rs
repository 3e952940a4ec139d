//! Backend operation trait.

use async_trait::async_trait;
use proto::{
    AssistantReply, BackendError, ChannelMessage, ChannelSendAck, CreateSessionRequest,
    HealthStatus, SessionEnvelope, SessionId, SessionSummary,
};

/// Every call the console makes against the backend.
///
/// Each method is a single attempt: no retry, no timeout, no cancellation.
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// `GET /api/health`
    async fn health(&self) -> Result<HealthStatus, BackendError>;

    /// `GET /api/chats`, in server order.
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, BackendError>;

    /// `POST /api/chats`; fields are sent verbatim.
    async fn create_session(
        &self,
        req: CreateSessionRequest,
    ) -> Result<SessionEnvelope, BackendError>;

    /// `GET /api/chats/{id}`
    async fn get_session(&self, id: &SessionId) -> Result<SessionEnvelope, BackendError>;

    /// `POST /api/telegram/send`
    async fn send_channel(&self, id: &SessionId, text: &str)
    -> Result<ChannelSendAck, BackendError>;

    /// `GET /api/telegram/messages?chat_id={id}`; returns only new messages.
    async fn poll_channel(&self, id: &SessionId) -> Result<Vec<ChannelMessage>, BackendError>;

    /// `POST /api/gemini/send`; the reply carries the authoritative record.
    async fn send_assistant(&self, id: &SessionId, text: &str)
    -> Result<AssistantReply, BackendError>;
}
