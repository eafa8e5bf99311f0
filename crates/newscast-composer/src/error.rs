use newscast_core::CompositionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat completions API returned HTTP {status} for {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("failed to deserialize response for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("completion response had no choices")]
    NoChoices,

    #[error("completion was empty after cleanup")]
    EmptyCompletion,

    #[error("invalid base URL {base_url}: {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl From<ComposerError> for CompositionError {
    fn from(err: ComposerError) -> Self {
        match err {
            ComposerError::Http(e) => CompositionError::Request(e.to_string()),
            ComposerError::UnexpectedStatus { status, .. } => CompositionError::Status { status },
            ComposerError::Deserialize { .. } | ComposerError::NoChoices => {
                CompositionError::Malformed(err.to_string())
            }
            ComposerError::EmptyCompletion => CompositionError::Empty,
            ComposerError::InvalidBaseUrl { .. } => CompositionError::Request(err.to_string()),
        }
    }
}
