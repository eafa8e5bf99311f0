//! Progress events for callers that display generation status.

use newscast_core::{BriefingOutcome, NewsQuality};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Progress {
    Collected {
        articles: usize,
        queries_failed: usize,
        source_unavailable: bool,
        news_quality: NewsQuality,
    },
    AttemptStarted {
        attempt: u32,
        target_words: u32,
        words_per_minute: f64,
    },
    Measured {
        attempt: u32,
        script_words: usize,
        measured_secs: f64,
        error_secs: f64,
        within_tolerance: bool,
    },
    AttemptFailed {
        attempt: u32,
        reason: String,
    },
    Finished {
        outcome: BriefingOutcome,
        measured_secs: f64,
        accuracy: f64,
    },
}
