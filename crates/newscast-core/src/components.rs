//! Component boundaries driven by the timing controller.
//!
//! Each external service client implements one of these traits; tests swap in
//! in-memory stubs.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::article::{ArticleSet, CollectionOutcome};
use crate::briefing::{Script, Tone};

/// Text-generation failure for one attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompositionError {
    #[error("text generation request failed: {0}")]
    Request(String),

    #[error("text generation service returned HTTP {status}")]
    Status { status: u16 },

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("text generation returned an empty script")]
    Empty,
}

/// Speech-synthesis failure for one attempt, including unmeasurable audio.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("speech synthesis request failed: {0}")]
    Request(String),

    #[error("speech synthesis service returned HTTP {status}")]
    Status { status: u16 },

    #[error("speech synthesis returned no audio")]
    EmptyAudio,

    #[error("could not measure audio duration: {0}")]
    Unmeasurable(String),
}

/// Audio returned by the renderer with its measured playback duration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAudio {
    pub bytes: Vec<u8>,
    /// Container tag, e.g. `mp3`, `wav`, `pcm`.
    pub format: String,
    /// Duration measured from the decoded stream, never estimated.
    pub duration_secs: f64,
}

/// Inputs for one script composition.
#[derive(Debug, Clone, Copy)]
pub struct CompositionBrief<'a> {
    pub topics: &'a [String],
    pub articles: &'a ArticleSet,
    pub target_words: u32,
    pub tone: Tone,
    pub language: &'a str,
}

#[async_trait]
pub trait ArticleCollector: Send + Sync {
    /// Collect and rank articles for `topics`.
    ///
    /// Never fails: unreachable search degrades to an empty set, reported
    /// through [`CollectionOutcome::source_unavailable`].
    async fn collect(&self, topics: &[String], recency_window: Duration) -> CollectionOutcome;
}

#[async_trait]
pub trait ScriptComposer: Send + Sync {
    /// Write narration sized to `brief.target_words`.
    ///
    /// The word count is a soft target; length correction is the caller's job.
    async fn compose(&self, brief: CompositionBrief<'_>) -> Result<Script, CompositionError>;
}

#[async_trait]
pub trait SpeechRenderer: Send + Sync {
    /// Synthesize `script` and measure the resulting audio.
    async fn render(
        &self,
        script: &Script,
        voice_id: &str,
        language: &str,
    ) -> Result<RenderedAudio, SynthesisError>;
}
