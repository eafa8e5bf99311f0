use thiserror::Error;

/// Errors raised while loading configuration or the voice catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read voices file {path}: {source}")]
    VoicesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse voices file: {0}")]
    VoicesFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// A briefing request that was rejected before any network call was made.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("at least one topic is required")]
    NoTopics,

    #[error("too many topics: {count} (max {max})")]
    TooManyTopics { count: usize, max: usize },

    #[error("topic is too long ({len} chars, max {max})")]
    TopicTooLong { len: usize, max: usize },

    #[error("duration {secs}s is outside the supported range {min}..={max}s")]
    DurationOutOfRange { secs: u32, min: u32, max: u32 },

    #[error("voice id must be non-empty")]
    EmptyVoice,

    #[error("language tag must be non-empty")]
    EmptyLanguage,

    #[error("unknown tone '{0}'")]
    UnknownTone(String),
}
