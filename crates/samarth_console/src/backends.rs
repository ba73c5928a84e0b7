use std::sync::Arc;

use chat_backend::ChatBackend;
use chat_backend_mock::{MockBackend, MOCK_BACKEND_ID};
use chat_backend_samarth_api::{
    SamarthApiBackend, SamarthApiBackendConfig, SAMARTH_API_BACKEND_ID,
};

use crate::config::EnvConfig;

pub const DEFAULT_BACKEND_ID: &str = SAMARTH_API_BACKEND_ID;
pub const BACKEND_ENV_VAR: &str = "SAMARTH_CHAT_BACKEND";

pub fn backend_from_env(config: &EnvConfig) -> Result<Arc<dyn ChatBackend>, String> {
    let backend_id = std::env::var(BACKEND_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    backend_for_id(backend_id.as_deref().unwrap_or(DEFAULT_BACKEND_ID), config)
}

pub fn backend_for_id(
    backend_id: &str,
    config: &EnvConfig,
) -> Result<Arc<dyn ChatBackend>, String> {
    match backend_id {
        SAMARTH_API_BACKEND_ID => {
            let backend_config = SamarthApiBackendConfig::new()
                .with_base_url(config.base_url.clone())
                .with_timeout(config.timeout);
            let backend =
                SamarthApiBackend::new(backend_config).map_err(|error| error.to_string())?;
            Ok(Arc::new(backend))
        }
        MOCK_BACKEND_ID => Ok(Arc::new(MockBackend::default())),
        unknown => Err(format!(
            "Unsupported backend '{unknown}'. Available backends: {SAMARTH_API_BACKEND_ID}, {MOCK_BACKEND_ID}"
        )),
    }
}
