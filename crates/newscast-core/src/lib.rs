//! Core types for the newscast briefing pipeline.
//!
//! Holds the request/result data model, voice calibration profiles, the timing
//! policy, the component traits the timing controller drives, and the
//! environment-backed application config.

pub mod app_config;
pub mod article;
pub mod briefing;
pub mod components;
pub mod config;
pub mod error;
pub mod text;
pub mod timing;
pub mod voices;

pub use app_config::AppConfig;
pub use article::{Article, ArticleSet, CollectionOutcome, NewsQuality};
pub use briefing::{
    AttemptStatus, AttemptSummary, BriefingOutcome, BriefingRequest, BriefingResult, Script, Tone,
    MAX_DURATION_SECS, MIN_DURATION_SECS,
};
pub use components::{
    ArticleCollector, CompositionBrief, CompositionError, RenderedAudio, ScriptComposer,
    SpeechRenderer, SynthesisError,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, RequestError};
pub use text::{truncate_chars, word_count};
pub use timing::{TimingPolicy, TolerancePolicy};
pub use voices::{load_voice_catalog, VoiceCatalog, VoiceProfile};
