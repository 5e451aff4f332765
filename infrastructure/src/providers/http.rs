//! Shared HTTP client, credential lookup, status handling and SSE parsing.

use fiesta_application::ProviderError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;

/// Build the client every adapter shares.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Where an adapter finds its API key.
///
/// Resolved on every call, so a server started without a key reports a
/// per-provider failure instead of refusing to start.
#[derive(Debug, Clone)]
pub struct Credential {
    env: String,
    inline: Option<String>,
}

impl Credential {
    pub fn new(env: impl Into<String>, inline: Option<String>) -> Self {
        Self {
            env: env.into(),
            inline,
        }
    }

    pub fn resolve(&self) -> Result<String, ProviderError> {
        if let Some(key) = self.inline.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.clone());
        }
        std::env::var(&self.env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingCredential(self.env.clone()))
    }
}

/// Request URLs are dropped so no query-string credential reaches the message.
pub fn transport(err: reqwest::Error) -> ProviderError {
    ProviderError::Transport(err.without_url().to_string())
}

pub fn malformed(err: impl std::fmt::Display) -> ProviderError {
    ProviderError::MalformedPayload(err.to_string())
}

/// Pass 2xx responses through; turn anything else into [`ProviderError::Status`].
pub async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        body: error_message(&body),
    })
}

/// Pull `error.message` out of a JSON error body, or return the body as-is.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .and_then(|m| m.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Parse an SSE "data:" line, returning None for "[DONE]" and non-data lines.
pub fn parse_sse_data(line: &str) -> Option<&str> {
    let data = line
        .strip_prefix("data: ")
        .or_else(|| line.strip_prefix("data:"))?;
    if data.trim() == "[DONE]" {
        return None;
    }
    Some(data)
}

pub fn is_sse_done(line: &str) -> bool {
    line.strip_prefix("data:")
        .is_some_and(|data| data.trim() == "[DONE]")
}
