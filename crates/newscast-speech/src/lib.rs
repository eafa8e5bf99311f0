//! Speech rendering for newscast briefings.
//!
//! Sends narration to an ElevenLabs-style text-to-speech API and measures the
//! playback duration of the returned audio from the stream itself: MPEG frame
//! headers for MP3, the RIFF header for WAV, sample arithmetic for raw PCM.

pub mod client;
pub mod duration;
pub mod error;
pub mod format;
pub mod mp3;
pub mod renderer;
pub mod types;

pub use client::ElevenLabsClient;
pub use duration::{measure_duration, AudioMeasurement};
pub use error::{MeasureError, SpeechError};
pub use format::OutputFormat;
pub use renderer::TtsRenderer;
pub use types::VoiceSettings;
