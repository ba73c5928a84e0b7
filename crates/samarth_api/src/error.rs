use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SamarthApiError {
    /// The server answered and explicitly reported a failure.
    #[error("{message}")]
    Application { message: String },

    #[error("HTTP {status}: {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("request timed out after {after_secs}s")]
    TimedOut { after_secs: u64 },

    #[error("request error: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("failed to decode response body: {source}")]
    Payload {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid header {name}")]
    InvalidHeader { name: String },

    #[error("failed to initialize async runtime: {0}")]
    Runtime(String),
}

impl SamarthApiError {
    #[must_use]
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Status {
            status,
            detail: detail.into(),
        }
    }

    /// Returns true for failures the server itself reported, as opposed to
    /// transport-level ones.
    #[must_use]
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application { .. })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub error: Option<String>,
}

/// Extracts a human-readable message from an error response body.
///
/// The server reports failures as `{"error": "<message>"}`. Bodies that do
/// not parse are returned verbatim; empty bodies fall back to the HTTP
/// status line.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = payload
            .error
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            return message.to_string();
        }
    }

    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}
