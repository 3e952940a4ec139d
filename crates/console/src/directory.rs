//! In-memory list of known chat sessions.

use proto::{SessionId, SessionSummary};

/// Sessions shown in the sidebar, in server order with local creations appended.
#[derive(Debug, Clone, Default)]
pub struct SessionDirectory {
    sessions: Vec<SessionSummary>,
}

impl SessionDirectory {
    /// Replaces the whole list with a fresh server listing.
    pub fn replace_all(&mut self, sessions: Vec<SessionSummary>) {
        self.sessions = sessions;
    }

    /// Appends a newly created session.
    ///
    /// Ids stay unique: an entry with the same id is updated in place.
    pub fn push(&mut self, summary: SessionSummary) {
        match self.position(&summary.id) {
            Some(idx) => self.sessions[idx] = summary,
            None => self.sessions.push(summary),
        }
    }

    /// Index of `id` in display order.
    pub fn position(&self, id: &SessionId) -> Option<usize> {
        self.sessions.iter().position(|s| &s.id == id)
    }

    /// Looks up a session by id.
    pub fn get(&self, id: &SessionId) -> Option<&SessionSummary> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    /// Session at display index `idx`.
    pub fn at(&self, idx: usize) -> Option<&SessionSummary> {
        self.sessions.get(idx)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionSummary> {
        self.sessions.iter()
    }
}
