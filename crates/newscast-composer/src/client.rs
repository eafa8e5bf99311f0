//! HTTP client for an OpenAI-style chat-completions API.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ComposerError;
use crate::types::{ChatMessage, ChatRequest, ChatResponse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// Client for `POST {base}/chat/completions` and `GET {base}/models`.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

impl OpenAiClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ComposerError> {
        Self::with_base_url(api_key, model, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (proxies, compatible servers,
    /// mock servers in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ComposerError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ComposerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ComposerError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one system + user exchange and returns the raw assistant text.
    ///
    /// A `null` content field is returned as an empty string; deciding
    /// whether that is usable is up to the caller.
    ///
    /// # Errors
    ///
    /// - [`ComposerError::Http`] on network failure or timeout.
    /// - [`ComposerError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ComposerError::Deserialize`] if the body is not a completion.
    /// - [`ComposerError::NoChoices`] if the completion has no choices.
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ComposerError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        };

        let url = self.endpoint("chat/completions")?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ComposerError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: "chat/completions".to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ComposerError::Deserialize {
                context: format!("chat/completions(model={})", self.model),
                source: e,
            })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(ComposerError::NoChoices)?;
        Ok(choice.message.content.unwrap_or_default())
    }

    /// Reachability and credential probe via `GET {base}/models`.
    ///
    /// # Errors
    ///
    /// Returns [`ComposerError::Http`] or [`ComposerError::UnexpectedStatus`].
    pub async fn ping(&self) -> Result<(), ComposerError> {
        let url = self.endpoint("models")?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ComposerError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: "models".to_string(),
            });
        }
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ComposerError> {
        self.base_url
            .join(path)
            .map_err(|e| ComposerError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}
