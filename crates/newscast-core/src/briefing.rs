//! Request, script, and result types for one briefing.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::article::{Article, NewsQuality};
use crate::error::RequestError;
use crate::text::word_count;

pub const MIN_DURATION_SECS: u32 = 60;
pub const MAX_DURATION_SECS: u32 = 900;
const MAX_TOPICS: usize = 10;
const MAX_TOPIC_CHARS: usize = 80;
const DEFAULT_LANGUAGE: &str = "en";

/// Narration style requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Conversational,
    Analytical,
    Upbeat,
}

impl Tone {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Conversational => "conversational",
            Tone::Analytical => "analytical",
            Tone::Upbeat => "upbeat",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Ok(Tone::Professional),
            "conversational" | "casual" => Ok(Tone::Conversational),
            "analytical" => Ok(Tone::Analytical),
            "upbeat" | "energetic" => Ok(Tone::Upbeat),
            other => Err(RequestError::UnknownTone(other.to_string())),
        }
    }
}

/// A validated briefing request. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BriefingRequest {
    topics: Vec<String>,
    duration_secs: u32,
    voice_id: String,
    language: String,
    tone: Tone,
}

impl BriefingRequest {
    /// Validate and build a request.
    ///
    /// Topics are trimmed and de-duplicated case-insensitively, keeping the
    /// first spelling. An empty `language` falls back to `en`; a missing tone
    /// falls back to [`Tone::Professional`].
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] when topics are missing or oversized, the
    /// duration is outside `60..=900` seconds, the voice id is blank, or the
    /// tone tag is not recognised.
    pub fn new<S: AsRef<str>>(
        topics: &[S],
        duration_secs: u32,
        voice_id: &str,
        language: Option<&str>,
        tone: Option<&str>,
    ) -> Result<Self, RequestError> {
        let mut seen = HashSet::new();
        let mut cleaned = Vec::new();
        for topic in topics {
            let trimmed = topic.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            let len = trimmed.chars().count();
            if len > MAX_TOPIC_CHARS {
                return Err(RequestError::TopicTooLong {
                    len,
                    max: MAX_TOPIC_CHARS,
                });
            }
            if seen.insert(trimmed.to_lowercase()) {
                cleaned.push(trimmed.to_string());
            }
        }

        if cleaned.is_empty() {
            return Err(RequestError::NoTopics);
        }
        if cleaned.len() > MAX_TOPICS {
            return Err(RequestError::TooManyTopics {
                count: cleaned.len(),
                max: MAX_TOPICS,
            });
        }

        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&duration_secs) {
            return Err(RequestError::DurationOutOfRange {
                secs: duration_secs,
                min: MIN_DURATION_SECS,
                max: MAX_DURATION_SECS,
            });
        }

        let voice_id = voice_id.trim();
        if voice_id.is_empty() {
            return Err(RequestError::EmptyVoice);
        }

        let language = match language.map(str::trim) {
            None => DEFAULT_LANGUAGE.to_string(),
            Some("") => return Err(RequestError::EmptyLanguage),
            Some(tag) => tag.to_string(),
        };

        let tone = match tone.map(str::trim).filter(|t| !t.is_empty()) {
            Some(tag) => tag.parse()?,
            None => Tone::default(),
        };

        Ok(Self {
            topics: cleaned,
            duration_secs,
            voice_id: voice_id.to_string(),
            language,
            tone,
        })
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn tone(&self) -> Tone {
        self.tone
    }
}

/// Narration text produced by the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub text: String,
    pub word_count: usize,
}

impl Script {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let word_count = word_count(&text);
        Self { text, word_count }
    }
}

/// How a single attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum AttemptStatus {
    /// Rendered and measured within tolerance.
    WithinTolerance,
    /// Rendered and measured, but outside tolerance.
    OutOfTolerance,
    /// The composer failed.
    CompositionFailed(String),
    /// The renderer failed or produced unmeasurable audio.
    SynthesisFailed(String),
}

/// Caller-facing record of one compose/render/measure cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptSummary {
    /// 1-based attempt index.
    pub index: u32,
    pub target_words: u32,
    pub words_per_minute: f64,
    pub script_words: Option<usize>,
    pub measured_secs: Option<f64>,
    pub error_secs: Option<f64>,
    #[serde(flatten)]
    pub status: AttemptStatus,
}

/// Whether the returned audio met tolerance or is the best of an exhausted budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefingOutcome {
    Accepted,
    BestEffort,
}

impl std::fmt::Display for BriefingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BriefingOutcome::Accepted => write!(f, "accepted"),
            BriefingOutcome::BestEffort => write!(f, "best_effort"),
        }
    }
}

/// Terminal output of a successful briefing generation.
#[derive(Debug, Clone, Serialize)]
pub struct BriefingResult {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub topics: Vec<String>,
    pub voice_id: String,
    pub language: String,
    pub tone: Tone,
    pub script: Script,
    #[serde(skip)]
    pub audio: Vec<u8>,
    /// Container of `audio`, e.g. `mp3` or `wav`.
    pub audio_format: String,
    pub measured_secs: f64,
    pub requested_secs: u32,
    /// `1 - |measured - requested| / requested`, floored at zero.
    pub accuracy: f64,
    pub within_tolerance: bool,
    pub outcome: BriefingOutcome,
    pub sources: Vec<Article>,
    pub generation_secs: f64,
    /// Attempts consumed, including failed ones.
    pub attempt_count: u32,
    pub attempts: Vec<AttemptSummary>,
    /// Every search query failed; the script was written without sources.
    pub source_unavailable: bool,
    pub news_quality: NewsQuality,
}

impl BriefingResult {
    /// Absolute difference between measured and requested duration.
    #[must_use]
    pub fn timing_error_secs(&self) -> f64 {
        (self.measured_secs - f64::from(self.requested_secs)).abs()
    }

    /// Accuracy as computed for a measured duration against a request.
    #[must_use]
    pub fn accuracy_for(measured_secs: f64, requested_secs: u32) -> f64 {
        let requested = f64::from(requested_secs);
        (1.0 - (measured_secs - requested).abs() / requested).max(0.0)
    }
}
