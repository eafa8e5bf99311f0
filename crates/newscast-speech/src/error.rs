use newscast_core::SynthesisError;
use thiserror::Error;

/// Failure to derive a duration from audio bytes.
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("audio is empty")]
    Empty,

    #[error("no MPEG audio frames found")]
    NoFrames,

    #[error("audio decodes to zero duration")]
    ZeroDuration,

    #[error("invalid WAV data: {0}")]
    Wav(#[from] hound::Error),
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("text-to-speech API returned HTTP {status} for {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("text-to-speech API returned an empty body")]
    EmptyAudio,

    #[error("unsupported output format {0:?}")]
    UnsupportedFormat(String),

    #[error("audio measurement failed: {0}")]
    Measure(#[from] MeasureError),

    #[error("invalid base URL {base_url}: {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl From<SpeechError> for SynthesisError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Http(e) => SynthesisError::Request(e.to_string()),
            SpeechError::UnexpectedStatus { status, .. } => SynthesisError::Status { status },
            SpeechError::EmptyAudio | SpeechError::Measure(MeasureError::Empty) => {
                SynthesisError::EmptyAudio
            }
            SpeechError::Measure(e) => SynthesisError::Unmeasurable(e.to_string()),
            SpeechError::UnsupportedFormat(_) | SpeechError::InvalidBaseUrl { .. } => {
                SynthesisError::Request(err.to_string())
            }
        }
    }
}
