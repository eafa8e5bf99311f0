//! HTTP client for an ElevenLabs-style text-to-speech API.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::SpeechError;
use crate::format::OutputFormat;
use crate::types::{TtsRequest, VoiceSettings};

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/";
const API_KEY_HEADER: &str = "xi-api-key";

/// Model families that honour an explicit `language_code`.
const LANGUAGE_CODE_MODEL_SUFFIXES: [&str; 2] = ["_turbo_v2_5", "_flash_v2_5"];

pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    base_url: Url,
    model_id: String,
    output_format: OutputFormat,
    voice_settings: VoiceSettings,
}

impl ElevenLabsClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        api_key: &str,
        model_id: &str,
        output_format: OutputFormat,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SpeechError> {
        Self::with_base_url(
            api_key,
            model_id,
            output_format,
            timeout_secs,
            user_agent,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`SpeechError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        model_id: &str,
        output_format: OutputFormat,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SpeechError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            model_id: model_id.to_owned(),
            output_format,
            voice_settings: VoiceSettings::default(),
        })
    }

    #[must_use]
    pub fn with_voice_settings(mut self, voice_settings: VoiceSettings) -> Self {
        self.voice_settings = voice_settings;
        self
    }

    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Language code to send, if the configured model accepts one.
    ///
    /// Only the primary subtag is sent: `pt-BR` becomes `pt`.
    fn language_code(&self, language: &str) -> Option<String> {
        let enforced = LANGUAGE_CODE_MODEL_SUFFIXES
            .iter()
            .any(|suffix| self.model_id.ends_with(suffix));
        if !enforced {
            return None;
        }
        language
            .split(['-', '_'])
            .next()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_ascii_lowercase)
    }

    /// Synthesizes `text` with `voice_id` and returns the raw audio bytes.
    ///
    /// # Errors
    ///
    /// - [`SpeechError::Http`] on network failure or timeout.
    /// - [`SpeechError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SpeechError::EmptyAudio`] if the body is empty.
    pub async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        language: &str,
    ) -> Result<Vec<u8>, SpeechError> {
        let mut url = self.endpoint("v1/text-to-speech/")?;
        url.path_segments_mut()
            .map_err(|()| SpeechError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "base URL cannot carry path segments".to_string(),
            })?
            .pop_if_empty()
            .push(voice_id);
        url.query_pairs_mut()
            .append_pair("output_format", &self.output_format.to_string());

        let request = TtsRequest {
            text,
            model_id: &self.model_id,
            voice_settings: self.voice_settings,
            language_code: self.language_code(language),
        };

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: "text-to-speech".to_string(),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        tracing::debug!(
            voice_id,
            model = %self.model_id,
            bytes = bytes.len(),
            "synthesized audio"
        );
        Ok(bytes.to_vec())
    }

    /// Credential probe via `GET {base}/v1/user`.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::Http`] or [`SpeechError::UnexpectedStatus`].
    pub async fn ping(&self) -> Result<(), SpeechError> {
        let url = self.endpoint("v1/user")?;
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: "user".to_string(),
            });
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, SpeechError> {
        self.base_url
            .join(path)
            .map_err(|e| SpeechError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(model: &str) -> ElevenLabsClient {
        ElevenLabsClient::with_base_url(
            "xi-test",
            model,
            OutputFormat::default(),
            5,
            "test",
            "http://localhost:1",
        )
        .unwrap()
    }

    #[test]
    fn multilingual_model_sends_no_language_code() {
        assert_eq!(client("eleven_multilingual_v2").language_code("es"), None);
    }

    #[test]
    fn enforcing_models_send_primary_subtag() {
        assert_eq!(
            client("eleven_turbo_v2_5").language_code("pt-BR").as_deref(),
            Some("pt")
        );
        assert_eq!(
            client("eleven_flash_v2_5").language_code("DE").as_deref(),
            Some("de")
        );
    }
}
