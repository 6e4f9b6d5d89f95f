use thiserror::Error;

/// Failure of a single call to the prediction service.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Non-2xx status. Displays as the raw response body.
    #[error("{body}")]
    Server { status: u16, body: String },

    /// The request never completed (DNS, refused connection, reset...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx status, but the body was not a prediction.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PredictError {
    pub fn status(&self) -> Option<u16> {
        match self {
            PredictError::Server { status, .. } => Some(*status),
            PredictError::Transport(err) => err.status().map(|s| s.as_u16()),
            PredictError::Decode(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a prediction is already in flight")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unrecognized environment `{0}` (expected development or production)")]
    UnknownMode(String),
}
