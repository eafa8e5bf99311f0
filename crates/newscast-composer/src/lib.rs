//! Script composition for newscast briefings.
//!
//! Builds a word-count-targeted prompt from ranked articles, calls an
//! OpenAI-style chat-completions endpoint, and cleans the completion into
//! plain narration suitable for speech synthesis.

pub mod client;
pub mod composer;
pub mod error;
pub mod prompt;
pub mod sanitize;
pub mod types;

pub use client::OpenAiClient;
pub use composer::{ComposerSettings, LlmComposer};
pub use error::ComposerError;
pub use prompt::{build_prompt, greeting_for_hour, Prompt};
pub use sanitize::sanitize_for_speech;
