//! Azure DevOps client error types.

use thiserror::Error;

/// Result type for Azure DevOps REST calls.
pub type AdoResult<T> = Result<T, AdoError>;

/// Errors that can occur while talking to the Azure DevOps REST API.
#[derive(Debug, Error)]
pub enum AdoError {
    /// The server answered with a status outside 200-299.
    ///
    /// `status_text` is the canonical reason for `status` and is empty for
    /// unregistered codes. `body` holds the raw response text, read in full
    /// before failing.
    #[error("ADO API error {status}{reason}: {body}", reason = reason_suffix(.status_text))]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request body could not be serialized, or a success body was not JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A query string could not be encoded.
    #[error("Query encoding error: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    /// A header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

fn reason_suffix(status_text: &str) -> String {
    if status_text.is_empty() {
        String::new()
    } else {
        format!(" {status_text}")
    }
}

impl AdoError {
    /// Create an API error from a response status and its body text.
    pub fn api(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Self::Api {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.into(),
        }
    }

    /// The HTTP status code, if this is an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
