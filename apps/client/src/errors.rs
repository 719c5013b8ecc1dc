use thiserror::Error;

/// Failure of a single backend call.
/// Callers decide how to surface it; the client never retries.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Text suitable for showing to the user inline.
    /// Server errors show the backend's own message; everything else uses the
    /// full error description.
    pub fn describe(&self) -> String {
        match self {
            ApiError::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the failure carries a non-blank description of its own.
    pub fn has_detail(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Server { message, .. } | ApiError::InvalidResponse(message) => {
                !message.trim().is_empty()
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Server { status: 404, .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::InvalidResponse(e.to_string())
    }
}
