/// Default base URL for a locally hosted Samarth server.
pub const DEFAULT_SAMARTH_BASE_URL: &str = "http://127.0.0.1:7860";

/// Normalize a base URL so endpoint paths can be appended directly.
///
/// Normalization rules:
/// 1) empty input falls back to the default base
/// 2) surrounding whitespace and trailing slashes are trimmed
/// 3) a trailing `/api` segment is dropped (endpoint paths carry it)
pub fn normalize_samarth_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_SAMARTH_BASE_URL
    } else {
        input.trim()
    };

    let trimmed = base.trim_end_matches('/');
    if let Some(stripped) = trimmed.strip_suffix("/api") {
        return stripped.to_string();
    }
    trimmed.to_string()
}
