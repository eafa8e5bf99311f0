//! [`SpeechRenderer`] implementation: synthesize, then measure.

use async_trait::async_trait;
use newscast_core::{RenderedAudio, Script, SpeechRenderer, SynthesisError};

use crate::client::ElevenLabsClient;
use crate::duration::measure_duration;
use crate::error::SpeechError;

pub struct TtsRenderer {
    client: ElevenLabsClient,
}

impl TtsRenderer {
    #[must_use]
    pub fn new(client: ElevenLabsClient) -> Self {
        Self { client }
    }

    /// Synthesize `script` and measure the returned audio.
    ///
    /// # Errors
    ///
    /// Any [`SpeechError`] from synthesis or measurement.
    pub async fn render_script(
        &self,
        script: &Script,
        voice_id: &str,
        language: &str,
    ) -> Result<RenderedAudio, SpeechError> {
        let bytes = self
            .client
            .synthesize(&script.text, voice_id, language)
            .await?;
        let measurement = measure_duration(&bytes, self.client.output_format())?;

        tracing::info!(
            voice_id,
            words = script.word_count,
            container = measurement.container,
            duration_secs = measurement.duration_secs,
            "rendered speech"
        );

        Ok(RenderedAudio {
            bytes,
            format: measurement.container.to_string(),
            duration_secs: measurement.duration_secs,
        })
    }
}

#[async_trait]
impl SpeechRenderer for TtsRenderer {
    async fn render(
        &self,
        script: &Script,
        voice_id: &str,
        language: &str,
    ) -> Result<RenderedAudio, SynthesisError> {
        self.render_script(script, voice_id, language)
            .await
            .map_err(|e| {
                tracing::warn!(voice_id, error = %e, "speech rendering failed");
                SynthesisError::from(e)
            })
    }
}
