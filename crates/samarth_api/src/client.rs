use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};

use crate::config::SamarthApiConfig;
use crate::error::{parse_error_message, SamarthApiError};
use crate::payload::{
    ChatRequestPayload, ChatResponsePayload, DatasetsPayload, HealthPayload, PipelineInfoPayload,
    SessionCreatePayload, SourcePayload,
};
use crate::url::normalize_samarth_url;

const SESSION_CREATE_PATH: &str = "/api/session/create";
const CHAT_PATH: &str = "/api/chat";
const HEALTH_PATH: &str = "/api/health";
const DATASETS_PATH: &str = "/api/datasets";

#[derive(Debug)]
pub struct SamarthApiClient {
    http: Client,
    config: SamarthApiConfig,
}

/// Session handle issued by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub session_id: String,
    pub created_at: Option<String>,
}

/// Successful chat turn as returned by the server.
#[derive(Debug, Clone)]
pub struct ChatSuccess {
    pub answer: String,
    pub sources: Vec<SourcePayload>,
    pub num_sources: u32,
    pub num_documents: u32,
    pub confidence: Option<f64>,
    pub pipeline_info: Option<PipelineInfoPayload>,
}

impl SamarthApiClient {
    pub fn new(config: SamarthApiConfig) -> Result<Self, SamarthApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|source| SamarthApiError::Transport { source })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SamarthApiConfig {
        &self.config
    }

    /// Returns the normalized base URL requests are issued against.
    pub fn base_url(&self) -> String {
        normalize_samarth_url(&self.config.base_url)
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    pub fn build_headers(&self) -> Result<HeaderMap, SamarthApiError> {
        let mut headers = HeaderMap::new();
        if let Some(user_agent) = self.config.user_agent.as_deref() {
            headers.insert(
                USER_AGENT,
                HeaderValue::from_str(user_agent).map_err(|_| SamarthApiError::InvalidHeader {
                    name: "User-Agent".to_string(),
                })?,
            );
        }
        for (key, value) in &self.config.extra_headers {
            headers.insert(
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    SamarthApiError::InvalidHeader { name: key.clone() }
                })?,
                HeaderValue::from_str(value).map_err(|_| SamarthApiError::InvalidHeader {
                    name: key.clone(),
                })?,
            );
        }
        Ok(headers)
    }

    pub fn build_session_create_request(&self) -> Result<reqwest::RequestBuilder, SamarthApiError> {
        let headers = self.build_headers()?;
        Ok(self
            .http
            .post(self.endpoint_url(SESSION_CREATE_PATH))
            .headers(headers)
            .header(CONTENT_TYPE, "application/json"))
    }

    pub fn build_chat_request(
        &self,
        request: &ChatRequestPayload,
    ) -> Result<reqwest::RequestBuilder, SamarthApiError> {
        let headers = self.build_headers()?;
        Ok(self
            .http
            .post(self.endpoint_url(CHAT_PATH))
            .headers(headers)
            .json(request))
    }

    pub fn build_health_request(&self) -> Result<reqwest::RequestBuilder, SamarthApiError> {
        let headers = self.build_headers()?;
        Ok(self.http.get(self.endpoint_url(HEALTH_PATH)).headers(headers))
    }

    pub fn build_datasets_request(&self) -> Result<reqwest::RequestBuilder, SamarthApiError> {
        let headers = self.build_headers()?;
        Ok(self
            .http
            .get(self.endpoint_url(DATASETS_PATH))
            .headers(headers))
    }

    /// Requests a fresh conversation session handle.
    pub async fn create_session(&self) -> Result<SessionGrant, SamarthApiError> {
        let response = self
            .build_session_create_request()?
            .send()
            .await
            .map_err(|error| self.classify_transport(error))?;
        let (status, body) = self.read_body(response).await?;

        let parsed: SessionCreatePayload = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(error) => return Err(self.body_failure(status, &body, error)),
        };
        if let Some(message) = non_empty(parsed.error) {
            return Err(SamarthApiError::application(message));
        }
        if !status.is_success() {
            return Err(SamarthApiError::status(
                status,
                parse_error_message(status, &body),
            ));
        }
        match non_empty(parsed.session_id) {
            Some(session_id) => Ok(SessionGrant {
                session_id,
                created_at: parsed.created_at,
            }),
            None => Err(SamarthApiError::MalformedResponse(
                "session response missing 'session_id'".to_string(),
            )),
        }
    }

    /// Executes one chat turn.
    ///
    /// A body carrying `error` maps to [`SamarthApiError::Application`] even
    /// when the HTTP status is non-2xx, matching the server's convention of
    /// reporting application failures with an error status attached.
    pub async fn chat(
        &self,
        request: &ChatRequestPayload,
    ) -> Result<ChatSuccess, SamarthApiError> {
        let response = self
            .build_chat_request(request)?
            .send()
            .await
            .map_err(|error| self.classify_transport(error))?;
        let (status, body) = self.read_body(response).await?;

        let parsed: ChatResponsePayload = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(error) => return Err(self.body_failure(status, &body, error)),
        };
        if let Some(message) = non_empty(parsed.error) {
            return Err(SamarthApiError::application(message));
        }
        if !status.is_success() {
            return Err(SamarthApiError::status(
                status,
                parse_error_message(status, &body),
            ));
        }
        match parsed.answer {
            Some(answer) => Ok(ChatSuccess {
                answer,
                sources: parsed.sources,
                num_sources: parsed.num_sources,
                num_documents: parsed.num_documents,
                confidence: parsed.confidence,
                pipeline_info: parsed.pipeline_info,
            }),
            None => Err(SamarthApiError::MalformedResponse(
                "chat response missing 'answer'".to_string(),
            )),
        }
    }

    /// Probes server health.
    pub async fn health(&self) -> Result<HealthPayload, SamarthApiError> {
        let response = self
            .build_health_request()?
            .send()
            .await
            .map_err(|error| self.classify_transport(error))?;
        let (status, body) = self.read_body(response).await?;

        if !status.is_success() {
            return Err(SamarthApiError::status(
                status,
                parse_error_message(status, &body),
            ));
        }
        serde_json::from_str(&body).map_err(|source| SamarthApiError::Payload { source })
    }

    /// Lists the datasets available for querying.
    pub async fn datasets(&self) -> Result<DatasetsPayload, SamarthApiError> {
        let response = self
            .build_datasets_request()?
            .send()
            .await
            .map_err(|error| self.classify_transport(error))?;
        let (status, body) = self.read_body(response).await?;

        if !status.is_success() {
            return Err(SamarthApiError::status(
                status,
                parse_error_message(status, &body),
            ));
        }
        serde_json::from_str(&body).map_err(|source| SamarthApiError::Payload { source })
    }

    async fn read_body(
        &self,
        response: Response,
    ) -> Result<(StatusCode, String), SamarthApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| self.classify_transport(error))?;
        Ok((status, body))
    }

    fn body_failure(
        &self,
        status: StatusCode,
        body: &str,
        source: serde_json::Error,
    ) -> SamarthApiError {
        if status.is_success() {
            SamarthApiError::Payload { source }
        } else {
            SamarthApiError::status(status, parse_error_message(status, body))
        }
    }

    fn classify_transport(&self, error: reqwest::Error) -> SamarthApiError {
        match (error.is_timeout(), self.config.timeout) {
            (true, Some(timeout)) => SamarthApiError::TimedOut {
                after_secs: timeout.as_secs(),
            },
            _ => SamarthApiError::Transport { source: error },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{non_empty, SamarthApiClient};
    use crate::config::SamarthApiConfig;
    use crate::error::SamarthApiError;

    #[test]
    fn endpoint_urls_join_normalized_base_and_path() {
        let config = SamarthApiConfig::new("http://127.0.0.1:7860/");
        let client = SamarthApiClient::new(config).expect("client");

        assert_eq!(
            client.endpoint_url(super::CHAT_PATH),
            "http://127.0.0.1:7860/api/chat"
        );
        assert_eq!(
            client.endpoint_url(super::SESSION_CREATE_PATH),
            "http://127.0.0.1:7860/api/session/create"
        );
    }

    #[test]
    fn build_headers_merges_user_agent_and_extras() {
        let config = SamarthApiConfig::default()
            .with_user_agent("samarth-console/0.1")
            .with_timeout(Duration::from_secs(5))
            .insert_header("x-forwarded-for", "10.0.0.1");
        let client = SamarthApiClient::new(config).expect("client");

        let headers = client.build_headers().expect("headers");
        assert_eq!(
            headers.get("user-agent").and_then(|value| value.to_str().ok()),
            Some("samarth-console/0.1")
        );
        assert_eq!(
            headers
                .get("x-forwarded-for")
                .and_then(|value| value.to_str().ok()),
            Some("10.0.0.1")
        );
    }

    #[test]
    fn build_headers_rejects_invalid_header_names() {
        let config = SamarthApiConfig::default().insert_header("bad header", "value");
        let client = SamarthApiClient::new(config).expect("client");

        let error = client
            .build_headers()
            .expect_err("header name with a space should be rejected");
        assert!(matches!(
            error,
            SamarthApiError::InvalidHeader { name } if name == "bad header"
        ));
    }

    #[test]
    fn non_empty_trims_and_drops_blank_values() {
        assert_eq!(non_empty(Some("  id-1 ".to_string())), Some("id-1".to_string()));
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }
}
