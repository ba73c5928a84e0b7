//! Transport-only client primitives for the Samarth QA server.
//!
//! This crate owns request building and response parsing for the server's
//! `/api` endpoints only. It intentionally contains no conversation state
//! and no UI coupling; callers decide what a failure means for a session.
//!
//! The wire contract is the Samarth Flask surface: JSON in both directions,
//! application failures reported as `{"error": "<message>"}` bodies with an
//! error HTTP status attached.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod url;

pub use client::{ChatSuccess, SamarthApiClient, SessionGrant};
pub use config::SamarthApiConfig;
pub use error::{parse_error_message, SamarthApiError};
pub use payload::{ChatRequestPayload, ChatResponsePayload, DatasetsPayload, HealthPayload};
pub use url::normalize_samarth_url;
