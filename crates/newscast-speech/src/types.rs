//! Wire types for the text-to-speech endpoint.

use serde::Serialize;

/// Voice rendering knobs sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
    pub style: f64,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.3,
            use_speaker_boost: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TtsRequest<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: VoiceSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}
