//! Session directory entries and full session records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::message::SessionId;

/// Client details attached to a session when it is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<String>,
    /// Keys the backend adds beyond the known ones, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry in the session directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    #[serde(default)]
    pub metadata: SessionMetadata,
}

impl SessionSummary {
    /// Sidebar label: the client name when set, otherwise the raw id.
    pub fn label(&self) -> &str {
        match self.metadata.client_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.id.as_str(),
        }
    }
}

/// Full server-side state of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub metadata: SessionMetadata,
    /// Assistant replies, positionally paired with `past`.
    #[serde(default)]
    pub generated: Vec<String>,
    /// User inputs to the assistant.
    #[serde(default)]
    pub past: Vec<String>,
    /// Backend-internal log entries; never interpreted here.
    #[serde(default)]
    pub messages: Vec<Value>,
}

/// One user input and the assistant reply it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptTurn {
    pub user: String,
    pub reply: String,
}

impl SessionRecord {
    /// Pairs `past[i]` with `generated[i]`.
    ///
    /// Runs to the longer of the two arrays; a missing counterpart is empty.
    pub fn transcript(&self) -> Vec<TranscriptTurn> {
        let len = self.past.len().max(self.generated.len());
        (0..len)
            .map(|i| TranscriptTurn {
                user: self.past.get(i).cloned().unwrap_or_default(),
                reply: self.generated.get(i).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Returns `true` when the assistant has not been consulted yet.
    pub fn is_transcript_empty(&self) -> bool {
        self.past.is_empty() && self.generated.is_empty()
    }

    /// Directory entry for this record.
    pub fn summary(&self, id: SessionId) -> SessionSummary {
        SessionSummary {
            id,
            metadata: self.metadata.clone(),
        }
    }
}
