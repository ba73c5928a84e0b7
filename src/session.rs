//! Server-side conversation session handle.
//!
//! The session id is an opaque string the server uses to track conversation
//! history. Acquisition is asynchronous and may race a `/new` reset, so every
//! attempt is tagged with an epoch; responses carrying a superseded epoch are
//! discarded instead of clobbering the current conversation's handle.

/// Token identifying one acquisition attempt.
pub type SessionEpoch = u64;

/// Result of applying an acquisition response to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The id was stored for the current conversation.
    Stored,
    /// The attempt failed; the session stays absent.
    Failed,
    /// The response belonged to a superseded attempt and was discarded.
    Stale,
}

/// Outcome of an acquisition attempt, as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Acquired {
        epoch: SessionEpoch,
        session_id: String,
    },
    Failed {
        epoch: SessionEpoch,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionManager {
    id: Option<String>,
    epoch: SessionEpoch,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    #[must_use]
    pub fn new() -> Self {
        Self { id: None, epoch: 0 }
    }

    /// Returns the current session id, absent until an acquisition succeeds.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Hands out the epoch token for the next acquisition attempt.
    #[must_use]
    pub fn begin_acquire(&self) -> SessionEpoch {
        self.epoch
    }

    /// Stores the acquired id, replacing any prior one. Responses from a
    /// superseded epoch are discarded.
    pub fn on_acquired(&mut self, epoch: SessionEpoch, id: impl Into<String>) -> SessionOutcome {
        if epoch != self.epoch {
            return SessionOutcome::Stale;
        }
        self.id = Some(id.into());
        SessionOutcome::Stored
    }

    /// Records a failed attempt. The session stays absent; submitting without
    /// an id is permitted and the server simply skips history tracking.
    pub fn on_failed(&mut self, epoch: SessionEpoch) -> SessionOutcome {
        if epoch != self.epoch {
            return SessionOutcome::Stale;
        }
        SessionOutcome::Failed
    }

    /// Discards the current id and supersedes any in-flight acquisition.
    /// Returns the epoch the next attempt must carry.
    pub fn reset(&mut self) -> SessionEpoch {
        self.id = None;
        self.epoch += 1;
        self.epoch
    }
}
