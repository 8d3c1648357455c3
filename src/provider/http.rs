//! Shared HTTP client and request helpers.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::ColloquyError;
use crate::types::ApiErrorBody;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// Timeouts are applied per request from the agent config.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_default()
    })
}

/// Bearer auth only; reqwest sets the content type for multipart bodies.
pub fn auth_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Bearer auth plus JSON content type.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = auth_headers(api_key);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Join a base URL and an endpoint path with exactly one slash.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Turn a non-success status into an API error, preferring the backend's message.
pub fn status_to_error(status: u16, body: &str) -> ColloquyError {
    let message = ApiErrorBody::message_from(body).unwrap_or_else(|| body.to_string());
    ColloquyError::api(status, message)
}
