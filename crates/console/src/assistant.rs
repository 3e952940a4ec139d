//! Assistant pane: request-driven, replaces the whole transcript on reply.

use proto::{AssistantReply, BackendError, ConsoleError, Pane, SessionId, SessionRecord};
use tracing::debug;

use crate::event::PendingSend;

/// Input line and in-flight flag of the assistant pane.
///
/// The transcript itself lives in the held session record owned by the
/// composition root; the pane never fetches on its own.
#[derive(Debug, Default)]
pub struct AssistantPane {
    /// Text typed but not yet sent.
    pub input: String,
    sending: bool,
}

impl AssistantPane {
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Validates the input line against the current selection.
    ///
    /// Same guards as the channel pane: blank input or an in-flight send is a
    /// no-op, a missing selection is a blocking warning.
    pub fn begin_send(
        &mut self,
        selected: Option<&SessionId>,
    ) -> Result<Option<PendingSend>, ConsoleError> {
        let text = self.input.trim();
        if text.is_empty() || self.sending {
            return Ok(None);
        }
        let Some(session) = selected else {
            return Err(ConsoleError::NoActiveSession(Pane::Assistant));
        };
        self.sending = true;
        Ok(Some(PendingSend {
            session: session.clone(),
            text: text.to_string(),
        }))
    }

    /// Resolves a send: on success the returned record replaces `record`
    /// wholesale and the input is cleared; on failure nothing but the
    /// sending flag changes.
    pub fn finish_send(
        &mut self,
        result: Result<AssistantReply, BackendError>,
        record: &mut Option<SessionRecord>,
    ) -> Result<(), ConsoleError> {
        self.sending = false;
        let reply = result?;
        debug!(
            reply_len = reply.reply.len(),
            turns = reply.chat.past.len(),
            "Assistant transcript replaced"
        );
        *record = Some(reply.chat);
        self.input.clear();
        Ok(())
    }
}
