//! [`ChatBackend`] implementation backed by the Samarth QA HTTP API.
//!
//! The transport client in `samarth_api` is async; conversation hosts call
//! backends from plain worker threads. Each call here drives the client to
//! completion on a private current-thread runtime so callers never touch an
//! executor.

use std::sync::Arc;
use std::time::Duration;

use chat_backend::{
    AskRequest, BackendInitError, BackendProfile, ChatBackend, ChatReply, DatasetEntry,
    EntitySets, HealthReport, PipelineInfo, Source, TurnFailure,
};
use samarth_api::payload::{EntitiesPayload, PipelineInfoPayload, SourcePayload};
use samarth_api::{
    ChatRequestPayload, ChatSuccess, DatasetsPayload, HealthPayload, SamarthApiClient,
    SamarthApiConfig, SamarthApiError, SessionGrant,
};

/// Identifier reported in [`BackendProfile::backend_id`].
pub const SAMARTH_API_BACKEND_ID: &str = "http";

/// Configuration accepted by [`SamarthApiBackend::new`].
///
/// Unset fields fall back to the transport defaults, notably the base URL
/// `http://127.0.0.1:7860`.
#[derive(Debug, Clone, Default)]
pub struct SamarthApiBackendConfig {
    base_url: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl SamarthApiBackendConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn into_samarth_api_config(self) -> SamarthApiConfig {
        let mut config = SamarthApiConfig::default();
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}

/// Blocking view of the transport client, seam for substituting a fake in
/// tests.
trait ApiClient: Send + Sync {
    fn create_session(&self) -> Result<SessionGrant, SamarthApiError>;
    fn chat(&self, request: &ChatRequestPayload) -> Result<ChatSuccess, SamarthApiError>;
    fn health(&self) -> Result<HealthPayload, SamarthApiError>;
    fn datasets(&self) -> Result<DatasetsPayload, SamarthApiError>;
}

struct DefaultApiClient {
    client: SamarthApiClient,
}

impl DefaultApiClient {
    fn block_on<T>(
        &self,
        future: impl std::future::Future<Output = Result<T, SamarthApiError>>,
    ) -> Result<T, SamarthApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| SamarthApiError::Runtime(error.to_string()))?;
        runtime.block_on(future)
    }
}

impl ApiClient for DefaultApiClient {
    fn create_session(&self) -> Result<SessionGrant, SamarthApiError> {
        self.block_on(self.client.create_session())
    }

    fn chat(&self, request: &ChatRequestPayload) -> Result<ChatSuccess, SamarthApiError> {
        self.block_on(self.client.chat(request))
    }

    fn health(&self) -> Result<HealthPayload, SamarthApiError> {
        self.block_on(self.client.health())
    }

    fn datasets(&self) -> Result<DatasetsPayload, SamarthApiError> {
        self.block_on(self.client.datasets())
    }
}

/// [`ChatBackend`] that forwards turns to a running Samarth server.
pub struct SamarthApiBackend {
    api_client: Arc<dyn ApiClient>,
    base_url: String,
}

impl SamarthApiBackend {
    /// Builds the backend and its HTTP client.
    ///
    /// Fails only on client construction problems; the server is not
    /// contacted here.
    pub fn new(config: SamarthApiBackendConfig) -> Result<Self, BackendInitError> {
        let client =
            SamarthApiClient::new(config.into_samarth_api_config()).map_err(map_init_error)?;
        let base_url = client.base_url();
        Ok(Self {
            api_client: Arc::new(DefaultApiClient { client }),
            base_url,
        })
    }

    #[cfg(test)]
    fn with_api_client_for_tests(
        api_client: Arc<dyn ApiClient>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_client,
            base_url: base_url.into(),
        }
    }
}

impl ChatBackend for SamarthApiBackend {
    fn profile(&self) -> BackendProfile {
        BackendProfile {
            backend_id: SAMARTH_API_BACKEND_ID.to_string(),
            base_url: Some(self.base_url.clone()),
        }
    }

    fn create_session(&self) -> Result<String, String> {
        self.api_client
            .create_session()
            .map(|grant| grant.session_id)
            .map_err(|error| error.to_string())
    }

    fn ask(&self, req: AskRequest) -> Result<ChatReply, TurnFailure> {
        let mut payload = ChatRequestPayload::new(req.question, req.session_id);
        if let Some(category) = req.category {
            payload = payload.with_category(category);
        }
        self.api_client
            .chat(&payload)
            .map(map_reply)
            .map_err(map_turn_failure)
    }

    fn health(&self) -> Result<HealthReport, String> {
        self.api_client
            .health()
            .map(map_health)
            .map_err(|error| error.to_string())
    }

    fn datasets(&self) -> Result<Vec<DatasetEntry>, String> {
        self.api_client
            .datasets()
            .map(map_datasets)
            .map_err(|error| error.to_string())
    }
}

fn map_init_error(error: SamarthApiError) -> BackendInitError {
    BackendInitError::new(format!("failed to initialize Samarth API client: {error}"))
}

fn map_turn_failure(error: SamarthApiError) -> TurnFailure {
    match error {
        SamarthApiError::Application { message } => TurnFailure::application(message),
        error @ SamarthApiError::TimedOut { .. } => TurnFailure::timed_out(error.to_string()),
        error => TurnFailure::transport(error.to_string()),
    }
}

fn map_reply(success: ChatSuccess) -> ChatReply {
    ChatReply {
        answer: success.answer,
        sources: success.sources.into_iter().map(map_source).collect(),
        pipeline_info: success.pipeline_info.map(map_pipeline_info),
        confidence: success.confidence,
    }
}

fn map_source(source: SourcePayload) -> Source {
    Source {
        name: source.dataset_name,
        category: source.category,
    }
}

fn map_pipeline_info(info: PipelineInfoPayload) -> PipelineInfo {
    PipelineInfo {
        query_variations: info.query_variations,
        retrieved_count: info.retrieved_count,
        reranked_count: info.reranked_count,
        final_context_count: info.final_context_count,
        entities: info.entities_found.map(map_entities),
    }
}

// `climate_terms` is reported on the wire but has no stats-panel line.
fn map_entities(entities: EntitiesPayload) -> EntitySets {
    EntitySets {
        crops: entities.crops,
        states: entities.states,
        metrics: entities.metrics,
    }
}

fn map_health(payload: HealthPayload) -> HealthReport {
    HealthReport {
        status: payload.status,
        system_ready: payload.system_ready,
        rag_mode: payload.rag_mode,
        openai_configured: payload.openai_configured,
        initialization_error: payload.initialization_error,
    }
}

fn map_datasets(payload: DatasetsPayload) -> Vec<DatasetEntry> {
    payload
        .datasets
        .into_iter()
        .map(|(id, info)| DatasetEntry {
            id,
            name: info.name,
            category: info.category,
            cached: info.cached,
            record_count: info.record_count,
        })
        .collect()
}
