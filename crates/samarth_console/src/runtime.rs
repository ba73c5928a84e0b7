//! Worker dispatch between the console loop and the chat backend.
//!
//! The loop thread owns [`samarth_chat::App`] and the receiving half of the
//! event channel; each backend call runs on its own named worker thread and
//! sends exactly one terminal event back. Worker panics are caught and
//! converted into failure events so the core's busy state is always
//! released.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use chat_backend::{AskRequest, ChatBackend, TurnEvent, TurnFailure, TurnId};
use samarth_chat::app::{ConversationHost, TurnRequest};
use samarth_chat::session::{SessionEpoch, SessionEvent};

/// Event delivered from a worker thread to the console loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    Turn(TurnEvent),
    Session(SessionEvent),
}

/// Host implementation backing the console loop.
pub struct ConsoleRuntime {
    backend: Arc<dyn ChatBackend>,
    events: Sender<ConsoleEvent>,
    next_turn_id: AtomicU64,
}

impl ConsoleRuntime {
    /// Creates the runtime and the receiving half of its event channel.
    pub fn new(backend: Arc<dyn ChatBackend>) -> (Self, Receiver<ConsoleEvent>) {
        let (events, receiver) = mpsc::channel();
        (
            Self {
                backend,
                events,
                next_turn_id: AtomicU64::new(1),
            },
            receiver,
        )
    }

    /// Backend handle for the synchronous probes (`/health`, `/datasets`).
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn ChatBackend> {
        &self.backend
    }

    fn start_turn_internal(&self, request: TurnRequest) -> Result<TurnId, String> {
        let turn_id = self.next_turn_id.fetch_add(1, Ordering::SeqCst);
        let ask = AskRequest {
            turn_id,
            question: request.question,
            session_id: request.session_id,
            category: request.category,
        };

        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        thread::Builder::new()
            .name(format!("samarth-turn-{turn_id}"))
            .spawn(move || run_turn_worker(backend, events, ask))
            .map_err(|error| format!("Failed to spawn turn worker: {error}"))?;

        tracing::debug!(turn_id, "dispatched chat turn");
        Ok(turn_id)
    }

    fn start_session_internal(&self, epoch: SessionEpoch) -> Result<(), String> {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        thread::Builder::new()
            .name(format!("samarth-session-{epoch}"))
            .spawn(move || run_session_worker(backend, events, epoch))
            .map(|_| ())
            .map_err(|error| format!("Failed to spawn session worker: {error}"))
    }
}

impl ConversationHost for ConsoleRuntime {
    fn start_turn(&mut self, request: TurnRequest) -> Result<TurnId, String> {
        self.start_turn_internal(request)
    }

    fn start_session(&mut self, epoch: SessionEpoch) -> Result<(), String> {
        self.start_session_internal(epoch)
    }

    /// No-op. The console renders a frame after every handled line and every
    /// applied event, so explicit render requests are already satisfied.
    fn request_render(&mut self) {}
}

fn run_turn_worker(
    backend: Arc<dyn ChatBackend>,
    events: Sender<ConsoleEvent>,
    request: AskRequest,
) {
    let turn_id = request.turn_id;
    let outcome = catch_unwind(AssertUnwindSafe(|| backend.ask(request)));

    let event = match outcome {
        Ok(Ok(reply)) => TurnEvent::Answered { turn_id, reply },
        Ok(Err(failure)) => TurnEvent::Failed { turn_id, failure },
        Err(_) => TurnEvent::Failed {
            turn_id,
            failure: TurnFailure::transport("Chat backend panicked"),
        },
    };

    // A send failure means the console already shut down.
    let _ = events.send(ConsoleEvent::Turn(event));
}

fn run_session_worker(
    backend: Arc<dyn ChatBackend>,
    events: Sender<ConsoleEvent>,
    epoch: SessionEpoch,
) {
    let outcome = catch_unwind(AssertUnwindSafe(|| backend.create_session()));

    let event = match outcome {
        Ok(Ok(session_id)) => SessionEvent::Acquired { epoch, session_id },
        Ok(Err(message)) => SessionEvent::Failed { epoch, message },
        Err(_) => SessionEvent::Failed {
            epoch,
            message: "Chat backend panicked".to_string(),
        },
    };

    let _ = events.send(ConsoleEvent::Session(event));
}
