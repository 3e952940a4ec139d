//! Request and response bodies of the backend HTTP API.

use serde::{Deserialize, Serialize};

use crate::message::{ChannelMessage, SessionId};
use crate::session::SessionRecord;

/// Body of `POST /api/chats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub client_phone: String,
    pub client_name: String,
    pub client_details: String,
}

/// Body of `POST /api/telegram/send` and `POST /api/gemini/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub chat_id: SessionId,
    pub text: String,
}

/// Response of `POST /api/chats` and `GET /api/chats/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEnvelope {
    pub id: SessionId,
    pub chat: SessionRecord,
}

/// Response of `POST /api/telegram/send`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSendAck {
    #[serde(default)]
    pub success: bool,
}

/// Response of `GET /api/telegram/messages`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollResponse {
    #[serde(default)]
    pub messages: Vec<ChannelMessage>,
}

/// Response of `POST /api/gemini/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    #[serde(default)]
    pub reply: String,
    pub chat: SessionRecord,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}
