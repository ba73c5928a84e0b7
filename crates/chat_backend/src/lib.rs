//! Minimal backend-agnostic contract for executing a single chat turn.
//!
//! This crate intentionally defines only the shared turn lifecycle and the
//! data carried across it. It excludes transport details, wire payloads, and
//! conversation-state concerns, which belong to backends and hosts.

use std::fmt;

/// Identifier for one chat turn.
pub type TurnId = u64;

/// Error returned while constructing/configuring a backend before any turn starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInitError {
    message: String,
}

impl BackendInitError {
    /// Creates a new backend initialization error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BackendInitError {}

impl From<String> for BackendInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for BackendInitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Input required to start a chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    pub turn_id: TurnId,
    pub question: String,
    pub session_id: Option<String>,
    pub category: Option<String>,
}

/// A cited dataset backing an answer, in server citation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub category: String,
}

/// Entities the retrieval pipeline recognized in the question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySets {
    pub crops: Vec<String>,
    pub states: Vec<String>,
    pub metrics: Vec<String>,
}

impl EntitySets {
    /// Returns true when no category holds any entity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.crops.is_empty() && self.states.is_empty() && self.metrics.is_empty()
    }
}

/// Retrieval/ranking stage statistics reported alongside an answer.
///
/// Counts absent from the wire default to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineInfo {
    pub query_variations: u32,
    pub retrieved_count: u32,
    pub reranked_count: u32,
    pub final_context_count: u32,
    pub entities: Option<EntitySets>,
}

/// Successful outcome of one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub answer: String,
    pub sources: Vec<Source>,
    pub pipeline_info: Option<PipelineInfo>,
    pub confidence: Option<f64>,
}

/// Failure category for an unsuccessful turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The server answered and explicitly reported an error.
    Application,
    /// The request failed before a response was obtained.
    Transport,
    /// The bounded wait for a response elapsed.
    TimedOut,
}

/// Unsuccessful outcome of one chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TurnFailure {
    /// Constructs a server-reported failure.
    #[must_use]
    pub fn application(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Application,
            message: message.into(),
        }
    }

    /// Constructs a transport-level failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }

    /// Constructs a timeout failure.
    #[must_use]
    pub fn timed_out(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::TimedOut,
            message: message.into(),
        }
    }
}

/// Terminal outcome event for a dispatched turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    Answered { turn_id: TurnId, reply: ChatReply },
    Failed { turn_id: TurnId, failure: TurnFailure },
}

impl TurnEvent {
    /// Returns the turn identifier associated with this event.
    #[must_use]
    pub fn turn_id(&self) -> TurnId {
        match self {
            Self::Answered { turn_id, .. } | Self::Failed { turn_id, .. } => *turn_id,
        }
    }
}

/// Server self-description returned by the health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    pub system_ready: bool,
    pub rag_mode: String,
    pub openai_configured: bool,
    pub initialization_error: Option<String>,
}

/// One dataset the server can answer questions over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub id: String,
    pub name: String,
    pub category: String,
    pub cached: bool,
    pub record_count: u64,
}

/// Immutable metadata describing a chat backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendProfile {
    pub backend_id: String,
    pub base_url: Option<String>,
}

/// Backend interface for session acquisition and chat turns.
///
/// All methods block the calling thread; hosts run them on worker threads.
pub trait ChatBackend: Send + Sync + 'static {
    /// Returns backend identity metadata.
    fn profile(&self) -> BackendProfile;

    /// Requests a fresh conversation session handle.
    ///
    /// Errors are human-readable and non-fatal: a conversation may proceed
    /// without a session id.
    fn create_session(&self) -> Result<String, String>;

    /// Executes one chat turn and returns its terminal outcome.
    fn ask(&self, req: AskRequest) -> Result<ChatReply, TurnFailure>;

    /// Probes server health.
    ///
    /// Backends may return an error when health reporting is unsupported.
    fn health(&self) -> Result<HealthReport, String> {
        Err("Health reporting is not supported by this backend".to_string())
    }

    /// Lists the datasets available for querying.
    ///
    /// Backends may return an error when dataset listing is unsupported.
    fn datasets(&self) -> Result<Vec<DatasetEntry>, String> {
        Err("Dataset listing is not supported by this backend".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AskRequest, BackendInitError, BackendProfile, ChatBackend, ChatReply, EntitySets,
        FailureKind, TurnEvent, TurnFailure,
    };

    struct MinimalBackend;

    impl ChatBackend for MinimalBackend {
        fn profile(&self) -> BackendProfile {
            BackendProfile {
                backend_id: "minimal".to_string(),
                base_url: None,
            }
        }

        fn create_session(&self) -> Result<String, String> {
            Ok("session-1".to_string())
        }

        fn ask(&self, req: AskRequest) -> Result<ChatReply, TurnFailure> {
            Ok(ChatReply {
                answer: format!("echo: {}", req.question),
                sources: Vec::new(),
                pipeline_info: None,
                confidence: None,
            })
        }
    }

    #[test]
    fn turn_event_turn_id_returns_event_turn_id() {
        let turn_id = 42;
        let events = [
            TurnEvent::Answered {
                turn_id,
                reply: ChatReply {
                    answer: "done".to_string(),
                    sources: Vec::new(),
                    pipeline_info: None,
                    confidence: None,
                },
            },
            TurnEvent::Failed {
                turn_id,
                failure: TurnFailure::transport("connection refused"),
            },
        ];

        for event in events {
            assert_eq!(event.turn_id(), turn_id);
        }
    }

    #[test]
    fn backend_init_error_preserves_message() {
        let error = BackendInitError::new("missing base url");
        assert_eq!(error.message(), "missing base url");
        assert_eq!(error.to_string(), "missing base url");
    }

    #[test]
    fn ask_request_carries_question_and_session() {
        let request = AskRequest {
            turn_id: 7,
            question: "rainfall in Punjab".to_string(),
            session_id: Some("session-9".to_string()),
            category: None,
        };

        assert_eq!(request.turn_id, 7);
        assert_eq!(request.question, "rainfall in Punjab");
        assert_eq!(request.session_id.as_deref(), Some("session-9"));
    }

    #[test]
    fn turn_failure_constructors_set_kind_and_message() {
        let application = TurnFailure::application("Question is required");
        assert_eq!(application.kind, FailureKind::Application);
        assert_eq!(application.message, "Question is required");

        let transport = TurnFailure::transport("connection reset");
        assert_eq!(transport.kind, FailureKind::Transport);

        let timed_out = TurnFailure::timed_out("no response within 120s");
        assert_eq!(timed_out.kind, FailureKind::TimedOut);
    }

    #[test]
    fn entity_sets_empty_only_when_all_categories_empty() {
        assert!(EntitySets::default().is_empty());

        let with_metric = EntitySets {
            metrics: vec!["yield".to_string()],
            ..EntitySets::default()
        };
        assert!(!with_metric.is_empty());
    }

    #[test]
    fn default_health_hook_reports_unsupported() {
        let backend = MinimalBackend;
        let error = backend
            .health()
            .expect_err("minimal backend should not support health reporting");

        assert_eq!(error, "Health reporting is not supported by this backend");
    }

    #[test]
    fn default_datasets_hook_reports_unsupported() {
        let backend = MinimalBackend;
        let error = backend
            .datasets()
            .expect_err("minimal backend should not support dataset listing");

        assert_eq!(error, "Dataset listing is not supported by this backend");
    }
}
