//! Error types for the Elasticsearch backend

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum EsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success status, with the cluster's error reason when it sent one.
    #[error("Elasticsearch returned {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl EsError {
    /// Builds a [`EsError::Status`] from an error response body.
    ///
    /// Elasticsearch reports `{"error": {"type": .., "reason": ..}}`; older
    /// clusters and proxies may send a plain string or no body at all.
    pub fn from_status(status: u16, body: &str) -> Self {
        let reason = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| match v.get("error") {
                Some(Value::Object(err)) => err
                    .get("reason")
                    .or_else(|| err.get("type"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            })
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "no response body".to_string()
                } else {
                    body.chars().take(200).collect()
                }
            });
        EsError::Status { status, reason }
    }
}
