use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Request payload for the chat endpoint.
///
/// `session_id` is always serialized, as `null` when no session was
/// acquired; the server tolerates that and simply skips history tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequestPayload {
    pub question: String,
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ChatRequestPayload {
    pub fn new(question: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            question: question.into(),
            session_id,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Response body of the chat endpoint.
///
/// Success and failure share one shape: a body carrying `error` is a failure
/// regardless of HTTP status. Unknown fields are tolerated.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponsePayload {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub sources: Vec<SourcePayload>,
    #[serde(default)]
    pub num_sources: u32,
    #[serde(default)]
    pub num_documents: u32,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub pipeline_info: Option<PipelineInfoPayload>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SourcePayload {
    pub dataset_name: String,
    #[serde(default)]
    pub category: String,
}

/// Retrieval stage counters; counts absent from the wire default to zero.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PipelineInfoPayload {
    #[serde(default)]
    pub query_variations: u32,
    #[serde(default)]
    pub retrieved_count: u32,
    #[serde(default)]
    pub reranked_count: u32,
    #[serde(default)]
    pub final_context_count: u32,
    #[serde(default)]
    pub entities_found: Option<EntitiesPayload>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EntitiesPayload {
    #[serde(default)]
    pub crops: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub climate_terms: Vec<String>,
}

/// Response body of the session-create endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionCreatePayload {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of the health endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HealthPayload {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub system_ready: bool,
    #[serde(default)]
    pub rag_mode: String,
    #[serde(default)]
    pub openai_configured: bool,
    #[serde(default)]
    pub initialization_error: Option<String>,
}

/// Response body of the datasets endpoint, keyed by dataset id.
///
/// `BTreeMap` keeps listing order deterministic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetsPayload {
    #[serde(default)]
    pub datasets: BTreeMap<String, DatasetInfoPayload>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DatasetInfoPayload {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub record_count: u64,
}
