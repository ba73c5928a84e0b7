//! Conversation controller.
//!
//! [`App`] owns the busy/idle state machine for the request lifecycle and
//! every piece of conversation state behind it: the transcript, the session
//! handle, and the two sidebar projections. Hosts feed it input and turn
//! events and perform all I/O through [`ConversationHost`]; the controller
//! itself never blocks.
//!
//! State machine: `Idle` accepts a submit, which dispatches exactly one
//! request and moves to `AwaitingResponse`; the turn's terminal event moves
//! back to `Idle` on every path, success or failure, so the input controls
//! are never left disabled.

use chat_backend::{ChatReply, FailureKind, TurnEvent, TurnFailure, TurnId};

use crate::log::{Message, MessageLog};
use crate::panels::{SourcesPanel, StatsPanel};
use crate::session::{SessionEpoch, SessionEvent, SessionManager, SessionOutcome};

/// Input-control state. Interactive iff `Idle`; at most one request is
/// outstanding at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyState {
    Idle,
    AwaitingResponse { turn_id: TurnId },
}

/// One chat turn as handed to the host; the host assigns the turn id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub question: String,
    pub session_id: Option<String>,
    pub category: Option<String>,
}

/// Host-side effects the controller drives.
pub trait ConversationHost {
    /// Starts one chat turn and returns its assigned turn id.
    fn start_turn(&mut self, request: TurnRequest) -> Result<TurnId, String>;

    /// Starts a session acquisition attempt carrying `epoch`.
    fn start_session(&mut self, epoch: SessionEpoch) -> Result<(), String>;

    fn request_render(&mut self);
}

const BUSY_NOTICE: &str = "A response is already in progress.";
const SESSION_FAILED_NOTICE: &str = "Failed to create session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub busy: BusyState,
    pub input: String,
    log: MessageLog,
    session: SessionManager,
    sources: SourcesPanel,
    stats: StatsPanel,
    notices: Vec<String>,
    category: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize_category(raw: Option<String>) -> Option<String> {
    let value = raw?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn failure_message(failure: &TurnFailure) -> String {
    let prefix = match failure.kind {
        FailureKind::Application => "⚠️ Error:",
        FailureKind::Transport => "⚠️ Network error:",
        FailureKind::TimedOut => "⚠️ Request timed out:",
    };
    format!("{prefix} {}", failure.message)
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self::with_category(None)
    }

    /// Creates a controller whose requests carry a fixed topic filter.
    #[must_use]
    pub fn with_category(category: Option<String>) -> Self {
        Self {
            busy: BusyState::Idle,
            input: String::new(),
            log: MessageLog::new(),
            session: SessionManager::new(),
            sources: SourcesPanel::new(),
            stats: StatsPanel::new(),
            notices: Vec::new(),
            category: sanitize_category(category),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.busy, BusyState::AwaitingResponse { .. })
    }

    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    #[must_use]
    pub fn sources(&self) -> &SourcesPanel {
        &self.sources
    }

    #[must_use]
    pub fn stats(&self) -> &StatsPanel {
        &self.stats
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session.id()
    }

    pub fn on_input_replace(&mut self, text: String) {
        self.input = text;
    }

    /// Queues a passive system notice for the host to display.
    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.notices.push(text.into());
    }

    /// Drains queued system notices in arrival order.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Submits the current input buffer as a question.
    ///
    /// Empty or whitespace-only input is silently ignored. While a turn is
    /// in flight the submit is refused with a notice; the in-flight turn is
    /// untouched. Otherwise the user message is appended, the loading entry
    /// and processing placeholder are shown, and exactly one turn is
    /// dispatched. The buffer is cleared in every case.
    pub fn on_submit(&mut self, host: &mut dyn ConversationHost) {
        let submitted = std::mem::take(&mut self.input);
        let question = submitted.trim().to_string();

        if question.is_empty() {
            host.request_render();
            return;
        }

        if self.is_busy() {
            self.push_notice(BUSY_NOTICE);
            host.request_render();
            return;
        }

        self.log.push(Message::user(question.clone()));
        self.log.show_loading();
        self.stats.set_processing();

        let request = TurnRequest {
            question,
            session_id: self.session.id().map(str::to_string),
            category: self.category.clone(),
        };

        match host.start_turn(request) {
            Ok(turn_id) => {
                self.busy = BusyState::AwaitingResponse { turn_id };
            }
            Err(error) => {
                self.log.clear_loading();
                self.log
                    .push(Message::assistant(format!("⚠️ Network error: {error}")));
                self.stats.set_error();
            }
        }

        host.request_render();
    }

    /// Applies the successful outcome of the active turn.
    ///
    /// The answer is appended for markup rendering and the sources panel is
    /// projected from the reply. The statistics panel is only projected when
    /// the reply carries pipeline info; otherwise it keeps showing the
    /// processing placeholder for this turn.
    pub fn on_turn_answered(&mut self, turn_id: TurnId, reply: ChatReply) {
        if !self.accepts_turn(turn_id) {
            return;
        }

        self.log.clear_loading();
        self.log.push(Message::assistant(reply.answer));
        self.sources.project(Some(&reply.sources));
        if let Some(info) = reply.pipeline_info.as_ref() {
            self.stats.project(Some(info));
        }

        self.finish_turn();
    }

    /// Applies the failed outcome of the active turn.
    pub fn on_turn_failed(&mut self, turn_id: TurnId, failure: TurnFailure) {
        if !self.accepts_turn(turn_id) {
            return;
        }

        self.log.clear_loading();
        self.log.push(Message::assistant(failure_message(&failure)));
        self.stats.set_error();

        self.finish_turn();
    }

    pub fn apply_turn_event(&mut self, event: TurnEvent) {
        match event {
            TurnEvent::Answered { turn_id, reply } => self.on_turn_answered(turn_id, reply),
            TurnEvent::Failed { turn_id, failure } => self.on_turn_failed(turn_id, failure),
        }
    }

    /// Starts a session acquisition attempt for the current epoch.
    pub fn begin_session_acquire(&mut self, host: &mut dyn ConversationHost) {
        let epoch = self.session.begin_acquire();
        if host.start_session(epoch).is_err() {
            self.on_session_failed(epoch);
        }
        host.request_render();
    }

    pub fn on_session_acquired(&mut self, epoch: SessionEpoch, session_id: String) {
        self.session.on_acquired(epoch, session_id);
    }

    /// Records a failed acquisition. Non-fatal: a single notice is queued and
    /// the conversation proceeds without a session id.
    pub fn on_session_failed(&mut self, epoch: SessionEpoch) {
        if self.session.on_failed(epoch) == SessionOutcome::Failed {
            self.push_notice(SESSION_FAILED_NOTICE);
        }
    }

    pub fn apply_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Acquired { epoch, session_id } => {
                self.on_session_acquired(epoch, session_id);
            }
            SessionEvent::Failed { epoch, message: _ } => self.on_session_failed(epoch),
        }
    }

    /// Starts a new conversation: clears the transcript back to the welcome
    /// view, resets both panels, discards the session id and dispatches a
    /// fresh acquisition. Refused with a notice while a turn is in flight.
    pub fn start_new_conversation(&mut self, host: &mut dyn ConversationHost) {
        if self.is_busy() {
            self.push_notice(BUSY_NOTICE);
            host.request_render();
            return;
        }

        self.log.clear();
        self.sources.reset();
        self.stats.reset();
        self.session.reset();
        self.begin_session_acquire(host);
    }

    fn accepts_turn(&self, turn_id: TurnId) -> bool {
        matches!(self.busy, BusyState::AwaitingResponse { turn_id: active } if active == turn_id)
    }

    // Sole release point for the busy state; every terminal turn path runs
    // through here.
    fn finish_turn(&mut self) {
        self.busy = BusyState::Idle;
    }
}
