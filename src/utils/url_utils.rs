use url::Url;

use crate::error::ApiError;

/// Checks that a caller-supplied URL is absolute http(s) and returns it trimmed.
pub fn validate_http_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl(format!("{trimmed}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(trimmed.to_string()),
        "http" | "https" => Err(ApiError::InvalidUrl(format!("{trimmed}: missing host"))),
        scheme => Err(ApiError::InvalidUrl(format!(
            "{trimmed}: unsupported scheme {scheme:?}"
        ))),
    }
}
