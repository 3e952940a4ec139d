//! Composition root: selection state, selection-driven refetch and dispatch.

use std::sync::Arc;

use backend::ConsoleApi;
use chrono::Utc;
use proto::{
    ConsoleError, CreateSessionRequest, SessionId, SessionRecord, TranscriptTurn,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::assistant::AssistantPane;
use crate::channel::ChannelPane;
use crate::directory::SessionDirectory;
use crate::event::{ConsoleEvent, FetchTicket, Outcome};
use crate::settings::{ConsoleSettings, RefetchMode};

/// Capacity of the background-result channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Owns every piece of console state and turns user actions into backend calls.
pub struct Console {
    api: Arc<dyn ConsoleApi>,
    settings: ConsoleSettings,
    events: mpsc::Sender<ConsoleEvent>,
    directory: SessionDirectory,
    channel: ChannelPane,
    assistant: AssistantPane,
    selected: Option<SessionId>,
    record: Option<SessionRecord>,
    loading: bool,
    creating: bool,
    fetch_seq: u64,
}

impl Console {
    /// Creates the console and the receiver its background tasks report to.
    pub fn new(
        api: Arc<dyn ConsoleApi>,
        settings: ConsoleSettings,
    ) -> (Self, mpsc::Receiver<ConsoleEvent>) {
        let (events, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let console = Self {
            api,
            settings,
            events,
            directory: SessionDirectory::default(),
            channel: ChannelPane::default(),
            assistant: AssistantPane::default(),
            selected: None,
            record: None,
            loading: false,
            creating: false,
            fetch_seq: 0,
        };
        (console, rx)
    }

    // ── Accessors ────────────────────────────────────────────

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    pub fn directory(&self) -> &SessionDirectory {
        &self.directory
    }

    pub fn channel(&self) -> &ChannelPane {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut ChannelPane {
        &mut self.channel
    }

    pub fn assistant(&self) -> &AssistantPane {
        &self.assistant
    }

    pub fn assistant_mut(&mut self) -> &mut AssistantPane {
        &mut self.assistant
    }

    /// Currently selected session id.
    pub fn selected(&self) -> Option<&SessionId> {
        self.selected.as_ref()
    }

    /// Held record of the selection (may briefly belong to an older one).
    pub fn record(&self) -> Option<&SessionRecord> {
        self.record.as_ref()
    }

    /// Paired assistant transcript of the held record.
    pub fn transcript(&self) -> Vec<TranscriptTurn> {
        self.record
            .as_ref()
            .map(SessionRecord::transcript)
            .unwrap_or_default()
    }

    /// `true` while a selection-driven record fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// `true` while a create-session call is outstanding.
    pub fn is_creating(&self) -> bool {
        self.creating
    }

    // ── Actions ──────────────────────────────────────────────

    /// Fetches the directory once. Failures are swallowed when applied.
    pub fn load_directory(&self) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.list_sessions().await;
            let _ = events.send(ConsoleEvent::DirectoryLoaded(result)).await;
        });
    }

    /// Makes `id` the active selection.
    ///
    /// Always refetches the record and restarts channel polling, even when
    /// `id` is already selected. In-flight fetches for earlier selections are
    /// not cancelled.
    pub fn select(&mut self, id: SessionId) -> FetchTicket {
        self.fetch_seq += 1;
        let ticket = FetchTicket {
            seq: self.fetch_seq,
            session: id.clone(),
        };
        info!(session = %id, seq = ticket.seq, "Session selected");

        self.selected = Some(id.clone());
        self.loading = true;
        self.channel.attach(
            id.clone(),
            Arc::clone(&self.api),
            self.settings.poll_interval,
            self.events.clone(),
        );

        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let spawned = ticket.clone();
        tokio::spawn(async move {
            let result = api.get_session(&id).await.map(|env| env.chat);
            let _ = events
                .send(ConsoleEvent::RecordFetched {
                    ticket: spawned,
                    result,
                })
                .await;
        });
        ticket
    }

    /// Starts creating a session from the form fields, sent verbatim.
    ///
    /// Returns `false` when a create call is already outstanding.
    pub fn create_session(&mut self, req: CreateSessionRequest) -> bool {
        if self.creating {
            return false;
        }
        self.creating = true;
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.create_session(req).await;
            let _ = events.send(ConsoleEvent::SessionCreated(result)).await;
        });
        true
    }

    /// Sends the channel input line. `Ok(false)` means nothing was dispatched.
    pub fn submit_channel(&mut self) -> Result<bool, ConsoleError> {
        let Some(pending) = self.channel.begin_send()? else {
            return Ok(false);
        };
        debug!(session = %pending.session, len = pending.text.len(), "Channel send dispatched");
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.send_channel(&pending.session, &pending.text).await;
            let _ = events
                .send(ConsoleEvent::ChannelSent { pending, result })
                .await;
        });
        Ok(true)
    }

    /// Sends the assistant input line. `Ok(false)` means nothing was dispatched.
    pub fn submit_assistant(&mut self) -> Result<bool, ConsoleError> {
        let Some(pending) = self.assistant.begin_send(self.selected.as_ref())? else {
            return Ok(false);
        };
        debug!(session = %pending.session, len = pending.text.len(), "Assistant send dispatched");
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.send_assistant(&pending.session, &pending.text).await;
            let _ = events
                .send(ConsoleEvent::AssistantReplied { pending, result })
                .await;
        });
        Ok(true)
    }

    // ── Event reducer ────────────────────────────────────────

    /// Applies one background result.
    ///
    /// Directory-load failures are swallowed. Send, create and record-fetch
    /// failures are returned to the caller after local flags are reset.
    pub fn apply(&mut self, event: ConsoleEvent) -> Result<Outcome, ConsoleError> {
        match event {
            ConsoleEvent::DirectoryLoaded(Ok(sessions)) => {
                debug!(count = sessions.len(), "Session directory loaded");
                self.directory.replace_all(sessions);
                Ok(Outcome::Updated)
            }
            ConsoleEvent::DirectoryLoaded(Err(e)) => {
                debug!(error = %e, "Ignoring session directory load failure");
                Ok(Outcome::Ignored)
            }
            ConsoleEvent::SessionCreated(result) => {
                self.creating = false;
                let created = result?;
                info!(session = %created.id, "Session created");
                self.directory.push(created.chat.summary(created.id.clone()));
                self.record = Some(created.chat);
                self.select(created.id.clone());
                Ok(Outcome::SessionCreated(created.id))
            }
            ConsoleEvent::RecordFetched { ticket, result } => {
                let latest = ticket.seq == self.fetch_seq;
                if !latest && self.settings.refetch_mode == RefetchMode::LatestOnly {
                    debug!(session = %ticket.session, seq = ticket.seq, "Dropping stale record fetch");
                    return Ok(Outcome::Ignored);
                }
                self.loading = false;
                match result {
                    Ok(record) => {
                        if !latest {
                            debug!(session = %ticket.session, seq = ticket.seq, "Applying out-of-order record fetch");
                        }
                        self.record = Some(record);
                        Ok(Outcome::Updated)
                    }
                    Err(e) => {
                        warn!(session = %ticket.session, error = %e, "Record fetch failed");
                        Err(e.into())
                    }
                }
            }
            ConsoleEvent::ChannelPolled { session, messages } => {
                if self.channel.apply_poll(&session, messages) {
                    Ok(Outcome::Updated)
                } else {
                    Ok(Outcome::Ignored)
                }
            }
            ConsoleEvent::ChannelSent { pending, result } => {
                let result = result.map(|_| ()).inspect_err(|e| {
                    warn!(session = %pending.session, error = %e, "Channel send failed");
                });
                self.channel.finish_send(&pending, result, Utc::now())?;
                Ok(Outcome::Updated)
            }
            ConsoleEvent::AssistantReplied { pending, result } => {
                if let Err(e) = &result {
                    warn!(session = %pending.session, error = %e, "Assistant send failed");
                }
                let stale = self.selected.as_ref() != Some(&pending.session);
                if stale && self.settings.refetch_mode == RefetchMode::LatestOnly {
                    let mut discarded = None;
                    self.assistant.finish_send(result, &mut discarded)?;
                    debug!(session = %pending.session, "Dropping assistant reply for previous selection");
                    return Ok(Outcome::Ignored);
                }
                self.assistant.finish_send(result, &mut self.record)?;
                Ok(Outcome::Updated)
            }
        }
    }
}
