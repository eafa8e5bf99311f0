use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search service returned HTTP {status} for query \"{query}\"")]
    UnexpectedStatus { status: u16, query: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("query \"{query}\" timed out after {timeout_ms}ms")]
    Timeout { query: String, timeout_ms: u128 },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
