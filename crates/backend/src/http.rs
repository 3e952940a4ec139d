//! `reqwest` implementation of [`ConsoleApi`].

use async_trait::async_trait;
use proto::{
    AssistantReply, BackendError, ChannelMessage, ChannelSendAck, CreateSessionRequest,
    HealthStatus, PollResponse, SendRequest, SessionEnvelope, SessionId, SessionSummary,
};
use reqwest::{Method, Url, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::api::ConsoleApi;

/// Backend origin used when nothing is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// JSON-over-HTTP client bound to one backend origin.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    poll_batch_size: Option<u32>,
}

impl HttpBackend {
    /// Creates a client targeting `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            poll_batch_size: None,
        }
    }

    /// Asks the backend for at most `batch_size` messages per poll.
    pub fn with_poll_batch_size(mut self, batch_size: Option<u32>) -> Self {
        self.poll_batch_size = batch_size;
        self
    }

    /// Returns the configured origin.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `{base}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let path = url.path().to_string();
        let mut builder = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            let payload =
                serde_json::to_vec(body).map_err(|e| BackendError::Decode(e.to_string()))?;
            builder = builder.body(payload);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(%method, %path, status = %status.as_u16(), "Backend response received");

        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Request {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            BackendError::Decode(format!(
                "{e}; body: {}",
                text.chars().take(200).collect::<String>()
            ))
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        self.request::<T, ()>(Method::GET, url, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, BackendError> {
        self.request(Method::POST, url, Some(body)).await
    }
}

#[async_trait]
impl ConsoleApi for HttpBackend {
    async fn health(&self) -> Result<HealthStatus, BackendError> {
        self.get(self.endpoint(&["api", "health"])?).await
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, BackendError> {
        let sessions: Vec<SessionSummary> = self.get(self.endpoint(&["api", "chats"])?).await?;
        debug!(count = sessions.len(), "Session directory fetched");
        Ok(sessions)
    }

    async fn create_session(
        &self,
        req: CreateSessionRequest,
    ) -> Result<SessionEnvelope, BackendError> {
        self.post(self.endpoint(&["api", "chats"])?, &req).await
    }

    async fn get_session(&self, id: &SessionId) -> Result<SessionEnvelope, BackendError> {
        self.get(self.endpoint(&["api", "chats", id.as_str()])?)
            .await
    }

    async fn send_channel(
        &self,
        id: &SessionId,
        text: &str,
    ) -> Result<ChannelSendAck, BackendError> {
        let body = SendRequest {
            chat_id: id.clone(),
            text: text.to_string(),
        };
        let ack: ChannelSendAck = self
            .post(self.endpoint(&["api", "telegram", "send"])?, &body)
            .await?;
        if !ack.success {
            warn!(session = %id, "Backend did not confirm channel delivery");
        }
        Ok(ack)
    }

    async fn poll_channel(&self, id: &SessionId) -> Result<Vec<ChannelMessage>, BackendError> {
        let mut url = self.endpoint(&["api", "telegram", "messages"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("chat_id", id.as_str());
            if let Some(batch) = self.poll_batch_size {
                query.append_pair("batch_size", &batch.to_string());
            }
        }
        let poll: PollResponse = self.get(url).await?;
        Ok(poll.messages)
    }

    async fn send_assistant(
        &self,
        id: &SessionId,
        text: &str,
    ) -> Result<AssistantReply, BackendError> {
        let body = SendRequest {
            chat_id: id.clone(),
            text: text.to_string(),
        };
        self.post(self.endpoint(&["api", "gemini", "send"])?, &body)
            .await
    }
}
