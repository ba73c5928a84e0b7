//! Deterministic mock implementation of the shared `chat_backend` contract.
//!
//! This crate contains no transport logic and is intended for local
//! development and contract-level integration testing.

use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chat_backend::{
    AskRequest, BackendProfile, ChatBackend, ChatReply, DatasetEntry, EntitySets, HealthReport,
    PipelineInfo, Source, TurnFailure,
};
use uuid::Uuid;

/// Stable backend identifier used for explicit startup selection.
pub const MOCK_BACKEND_ID: &str = "mock";

/// One scripted turn outcome.
pub type ScriptedReply = Result<ChatReply, TurnFailure>;

/// Deterministic mock backend used by `samarth_console` tests and local runs.
///
/// Replies are consumed in script order; once the script is exhausted the
/// last entry repeats for every further turn.
#[derive(Debug)]
pub struct MockBackend {
    replies: Vec<ScriptedReply>,
    cursor: Mutex<usize>,
}

impl MockBackend {
    const REPLY_DELAY_MS: u64 = 200;

    /// Creates a mock backend with caller-provided scripted outcomes.
    #[must_use]
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: sanitize_replies(replies),
            cursor: Mutex::new(0),
        }
    }

    fn next_reply(&self) -> ScriptedReply {
        let mut cursor = lock_unpoisoned(&self.cursor);
        let index = (*cursor).min(self.replies.len() - 1);
        *cursor += 1;
        self.replies[index].clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(vec![Ok(canned_reply())])
    }
}

impl ChatBackend for MockBackend {
    fn profile(&self) -> BackendProfile {
        BackendProfile {
            backend_id: MOCK_BACKEND_ID.to_string(),
            base_url: None,
        }
    }

    fn create_session(&self) -> Result<String, String> {
        Ok(Uuid::new_v4().to_string())
    }

    fn ask(&self, req: AskRequest) -> Result<ChatReply, TurnFailure> {
        let _ = req.question;
        thread::sleep(Duration::from_millis(Self::REPLY_DELAY_MS));
        self.next_reply()
    }

    fn health(&self) -> Result<HealthReport, String> {
        Ok(HealthReport {
            status: "ok".to_string(),
            system_ready: true,
            rag_mode: "mock".to_string(),
            openai_configured: false,
            initialization_error: None,
        })
    }

    fn datasets(&self) -> Result<Vec<DatasetEntry>, String> {
        Ok(vec![
            DatasetEntry {
                id: "rainfall_imd".to_string(),
                name: "IMD Rainfall".to_string(),
                category: "climate".to_string(),
                cached: true,
                record_count: 12_000,
            },
            DatasetEntry {
                id: "crop_production".to_string(),
                name: "Crop Production".to_string(),
                category: "agriculture".to_string(),
                cached: false,
                record_count: 850,
            },
        ])
    }
}

fn canned_reply() -> ChatReply {
    ChatReply {
        answer: concat!(
            "## Rainfall and crop outlook\n",
            "\n",
            "Monsoon rainfall across the surveyed districts has stayed **close to the ",
            "long-period average**, with a mild deficit in the north-west.\n",
            "\n",
            "- Rice sowing is broadly on schedule\n",
            "- Wheat stocks remain comfortable going into the rabi season\n",
            "- Reservoir levels support one more irrigation cycle\n",
        )
        .to_string(),
        sources: vec![
            Source {
                name: "IMD Rainfall".to_string(),
                category: "climate".to_string(),
            },
            Source {
                name: "Crop Production".to_string(),
                category: "agriculture".to_string(),
            },
        ],
        pipeline_info: Some(PipelineInfo {
            query_variations: 3,
            retrieved_count: 20,
            reranked_count: 8,
            final_context_count: 5,
            entities: Some(EntitySets {
                crops: vec!["rice".to_string(), "wheat".to_string()],
                states: Vec::new(),
                metrics: vec!["rainfall".to_string()],
            }),
        }),
        confidence: Some(0.82),
    }
}

fn sanitize_replies(replies: Vec<ScriptedReply>) -> Vec<ScriptedReply> {
    if replies.is_empty() {
        vec![Ok(canned_reply())]
    } else {
        replies
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
