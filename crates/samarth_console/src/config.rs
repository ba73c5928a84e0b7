//! Environment configuration.

use std::env;
use std::time::Duration;

pub const BASE_URL_ENV_VAR: &str = "SAMARTH_CHAT_BASE_URL";
pub const TIMEOUT_ENV_VAR: &str = "SAMARTH_CHAT_TIMEOUT_SEC";
pub const CATEGORY_ENV_VAR: &str = "SAMARTH_CHAT_CATEGORY";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7860";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub category: Option<String>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            category: None,
        }
    }
}

impl EnvConfig {
    /// Reads the console configuration from the environment.
    ///
    /// Fails only on an unparseable timeout; absent or empty variables fall
    /// back to their defaults.
    pub fn from_env() -> Result<Self, String> {
        let base_url = env_string_opt(BASE_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = match env_string_opt(TIMEOUT_ENV_VAR) {
            Some(raw) => parse_timeout_secs(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let category = env_string_opt(CATEGORY_ENV_VAR);

        Ok(Self {
            base_url,
            timeout,
            category,
        })
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, String> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(format!(
            "{TIMEOUT_ENV_VAR} must be a positive integer number of seconds, got '{raw}'"
        )),
    }
}
