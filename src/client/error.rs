use reqwest::StatusCode;
use serde_json::Value;

use crate::auth::error::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("Http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Api error: {0} - {1}")]
    ApiError(StatusCode, String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Failed to serialize object: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Auth session error: {0}")]
    Auth(#[from] AuthError),
}

impl ApiClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiClientError::ApiError(status, _) => Some(*status),
            ApiClientError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            ApiClientError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// The `message` field of a JSON error body when the server sent one,
    /// otherwise `fallback`. Timeouts and 404s get the same treatment.
    pub fn user_message(&self, fallback: &str) -> String {
        let body = match self {
            ApiClientError::ApiError(_, body) | ApiClientError::Unauthorized(body) => body,
            _ => return fallback.to_string(),
        };

        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| match json.get("message") {
                Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
                Some(Value::Array(parts)) => {
                    let parts: Vec<&str> = parts.iter().filter_map(Value::as_str).collect();
                    (!parts.is_empty()).then(|| parts.join("; "))
                }
                _ => None,
            });

        message.unwrap_or_else(|| fallback.to_string())
    }
}
