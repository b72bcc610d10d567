use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// The configured cluster URL cannot be used.
    #[error("Invalid cluster url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request never produced a response (connect, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The cluster answered with a non-success status.
    #[error("Cluster responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected search response shape.
    #[error("Malformed cluster response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Generic adapter error.
    #[error("Adapter error: {0}")]
    Generic(String),
}

impl AdapterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdapterError::Status { status: 404, .. })
    }
}
