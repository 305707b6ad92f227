//! Ошибки обращения к API и их приведение к тексту для уведомления

use serde_json::Value;
use thiserror::Error;

/// Generic text shown when neither the server nor the transport gave anything useful.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Failure of a request to the admin API.
///
/// Callers never branch on the variant beyond showing [`ApiError::user_message`];
/// the variants only exist so the message can be picked in the right order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Request never produced a response (network down, CORS, aborted).
    #[error("network error: {0}")]
    Transport(String),

    /// Server answered with a non-success status.
    #[error("server returned {status}")]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// Response body could not be read or parsed.
    #[error("failed to parse response: {0}")]
    Decode(String),

    /// No admin token in the session for an endpoint that needs one.
    #[error("not authenticated")]
    NotAuthenticated,
}

impl ApiError {
    /// Builds a server error from the status and the raw response body.
    ///
    /// Picks up `message` from a JSON body; anything else is ignored.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(server_message);
        ApiError::Server { status, message }
    }

    /// Human-readable text for a toast.
    ///
    /// Server message first, then the transport description, then `fallback`
    /// (or [`DEFAULT_ERROR_MESSAGE`] when the fallback is blank).
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Server {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            ApiError::Transport(m) if !m.trim().is_empty() => m.clone(),
            _ if !fallback.trim().is_empty() => fallback.to_string(),
            _ => DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Extracts the human-readable `message` field of a response body, if any.
pub fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
