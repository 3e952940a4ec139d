//! Shared wire and domain types for the ConvoSphere console.
//!
//! This crate defines the serializable session/message structures exchanged
//! with the backend and the strongly-typed error enums shared across the
//! workspace.

pub mod error;
pub mod message;
pub mod session;
pub mod wire;

/// Re-export of all console error types.
pub use error::*;
/// Re-export of identity and channel message types.
pub use message::{ChannelMessage, LOCAL_SENDER, SessionId};
/// Re-export of session directory and transcript types.
pub use session::{SessionMetadata, SessionRecord, SessionSummary, TranscriptTurn};
/// Re-export of request/response bodies.
pub use wire::{
    AssistantReply, ChannelSendAck, CreateSessionRequest, HealthStatus, PollResponse,
    SendRequest, SessionEnvelope,
};
