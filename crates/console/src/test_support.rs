//! Scripted [`ConsoleApi`] fake shared by the console tests.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use backend::ConsoleApi;
use parking_lot::Mutex;
use proto::{
    AssistantReply, BackendError, ChannelMessage, ChannelSendAck, CreateSessionRequest,
    HealthStatus, SessionEnvelope, SessionId, SessionMetadata, SessionRecord, SessionSummary,
};

/// Records every call and answers from per-endpoint scripts.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    pub calls: Mutex<Vec<String>>,
    pub sessions: Mutex<Option<Result<Vec<SessionSummary>, BackendError>>>,
    pub records: Mutex<HashMap<SessionId, SessionRecord>>,
    pub created: Mutex<Vec<CreateSessionRequest>>,
    pub polls: Mutex<VecDeque<Result<Vec<ChannelMessage>, BackendError>>>,
    pub channel_send: Mutex<Option<BackendError>>,
    pub assistant_reply: Mutex<Option<Result<SessionRecord, BackendError>>>,
}

impl ScriptedApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

pub(crate) fn backend_failure(status: u16) -> BackendError {
    BackendError::Request {
        status,
        body: "boom".to_string(),
    }
}

pub(crate) fn record_with(past: &[&str], generated: &[&str]) -> SessionRecord {
    SessionRecord {
        past: past.iter().map(|s| s.to_string()).collect(),
        generated: generated.iter().map(|s| s.to_string()).collect(),
        ..SessionRecord::default()
    }
}

pub(crate) fn remote_message(text: &str) -> ChannelMessage {
    ChannelMessage {
        sender: "Telegram".to_string(),
        text: text.to_string(),
        timestamp: 1_700_000_000.0,
    }
}

#[async_trait]
impl ConsoleApi for ScriptedApi {
    async fn health(&self) -> Result<HealthStatus, BackendError> {
        self.record("health".to_string());
        Ok(HealthStatus {
            status: "ok".to_string(),
        })
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, BackendError> {
        self.record("list".to_string());
        self.sessions.lock().clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create_session(
        &self,
        req: CreateSessionRequest,
    ) -> Result<SessionEnvelope, BackendError> {
        self.record("create".to_string());
        self.created.lock().push(req.clone());
        let name = if req.client_name.is_empty() {
            "client".to_string()
        } else {
            req.client_name.clone()
        };
        let chat = SessionRecord {
            metadata: SessionMetadata {
                client_name: Some(name.clone()),
                client_phone: Some(req.client_phone),
                client_details: Some(req.client_details),
                ..SessionMetadata::default()
            },
            ..SessionRecord::default()
        };
        let id = SessionId::from(format!("{name}_start_1"));
        self.records.lock().insert(id.clone(), chat.clone());
        Ok(SessionEnvelope { id, chat })
    }

    async fn get_session(&self, id: &SessionId) -> Result<SessionEnvelope, BackendError> {
        self.record(format!("get:{id}"));
        match self.records.lock().get(id) {
            Some(chat) => Ok(SessionEnvelope {
                id: id.clone(),
                chat: chat.clone(),
            }),
            None => Err(backend_failure(404)),
        }
    }

    async fn send_channel(
        &self,
        id: &SessionId,
        text: &str,
    ) -> Result<ChannelSendAck, BackendError> {
        self.record(format!("send_channel:{id}:{text}"));
        match self.channel_send.lock().clone() {
            Some(err) => Err(err),
            None => Ok(ChannelSendAck { success: true }),
        }
    }

    async fn poll_channel(&self, id: &SessionId) -> Result<Vec<ChannelMessage>, BackendError> {
        self.record(format!("poll:{id}"));
        self.polls.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn send_assistant(
        &self,
        id: &SessionId,
        text: &str,
    ) -> Result<AssistantReply, BackendError> {
        self.record(format!("send_assistant:{id}:{text}"));
        let scripted = self.assistant_reply.lock().clone();
        match scripted {
            Some(Ok(chat)) => Ok(AssistantReply {
                reply: chat.generated.last().cloned().unwrap_or_default(),
                chat,
            }),
            Some(Err(err)) => Err(err),
            None => Err(backend_failure(500)),
        }
    }
}
