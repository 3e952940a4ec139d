//! Channel pane: interval polling for inbound messages plus optimistic send.

use std::sync::Arc;
use std::time::Duration;

use backend::ConsoleApi;
use chrono::{DateTime, Utc};
use proto::{BackendError, ChannelMessage, ConsoleError, Pane, SessionId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::event::{ConsoleEvent, PendingSend};

/// Handle to the running polling task; cancels it on drop.
struct Poller {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Message list, input line and polling task of the channel pane.
#[derive(Default)]
pub struct ChannelPane {
    session: Option<SessionId>,
    messages: Vec<ChannelMessage>,
    /// Text typed but not yet sent.
    pub input: String,
    sending: bool,
    poller: Option<Poller>,
}

impl ChannelPane {
    /// Binds the pane to `session`: clears the list and restarts polling.
    ///
    /// Any previous polling task is cancelled first, so at most one runs.
    pub fn attach(
        &mut self,
        session: SessionId,
        api: Arc<dyn ConsoleApi>,
        period: Duration,
        events: mpsc::Sender<ConsoleEvent>,
    ) {
        self.detach();
        self.messages.clear();

        let token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            api,
            session.clone(),
            period,
            events,
            token.clone(),
        ));
        debug!(session = %session, period_ms = period.as_millis() as u64, "Channel polling started");
        self.poller = Some(Poller { token, handle });
        self.session = Some(session);
    }

    /// Stops polling. The message list is left as is.
    pub fn detach(&mut self) {
        if let Some(poller) = self.poller.take() {
            debug!(session = ?self.session, "Channel polling stopped");
            drop(poller);
        }
    }

    /// Session the pane is currently attached to.
    pub fn session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    /// Messages in display order, newest last.
    pub fn messages(&self) -> &[ChannelMessage] {
        &self.messages
    }

    /// Whether a send is in flight (submission disabled).
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Whether a polling task is alive.
    pub fn is_polling(&self) -> bool {
        self.poller
            .as_ref()
            .is_some_and(|p| !p.token.is_cancelled() && !p.handle.is_finished())
    }

    /// Appends one poll batch verbatim. Batches for another session are dropped.
    pub fn apply_poll(&mut self, session: &SessionId, batch: Vec<ChannelMessage>) -> bool {
        if self.session.as_ref() != Some(session) {
            debug!(session = %session, count = batch.len(), "Dropping poll batch for detached session");
            return false;
        }
        if batch.is_empty() {
            return false;
        }
        self.messages.extend(batch);
        true
    }

    /// Validates the input line and marks the pane as sending.
    ///
    /// Returns `Ok(None)` when there is nothing to send or a send is already
    /// in flight, and `NoActiveSession` when no session is attached.
    pub fn begin_send(&mut self) -> Result<Option<PendingSend>, ConsoleError> {
        let text = self.input.trim();
        if text.is_empty() || self.sending {
            return Ok(None);
        }
        let Some(session) = self.session.clone() else {
            return Err(ConsoleError::NoActiveSession(Pane::Channel));
        };
        self.sending = true;
        Ok(Some(PendingSend {
            session,
            text: text.to_string(),
        }))
    }

    /// Resolves a send started by [`Self::begin_send`].
    ///
    /// On success a local `"You"` message stamped `now` is appended (if the
    /// pane is still on the same session) and the input is cleared. On
    /// failure the input is kept. Submission is re-enabled either way.
    pub fn finish_send(
        &mut self,
        pending: &PendingSend,
        result: Result<(), BackendError>,
        now: DateTime<Utc>,
    ) -> Result<(), ConsoleError> {
        self.sending = false;
        result?;
        if self.session.as_ref() == Some(&pending.session) {
            self.messages
                .push(ChannelMessage::local_at(pending.text.clone(), now));
        }
        self.input.clear();
        Ok(())
    }
}

/// One poll per tick until cancelled; failures are skipped.
async fn poll_loop(
    api: Arc<dyn ConsoleApi>,
    session: SessionId,
    period: Duration,
    events: mpsc::Sender<ConsoleEvent>,
    token: CancellationToken,
) {
    let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticks.tick() => {}
        }

        let result = tokio::select! {
            _ = token.cancelled() => break,
            result = api.poll_channel(&session) => result,
        };

        match result {
            Ok(messages) if messages.is_empty() => {}
            Ok(messages) => {
                let event = ConsoleEvent::ChannelPolled {
                    session: session.clone(),
                    messages,
                };
                if events.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!(session = %session, error = %e, "Poll tick failed");
            }
        }
    }
}
