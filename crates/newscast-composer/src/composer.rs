//! [`ScriptComposer`] implementation over the chat-completions client.

use async_trait::async_trait;
use chrono::{Local, Timelike};
use newscast_core::{CompositionBrief, CompositionError, Script, ScriptComposer};

use crate::client::OpenAiClient;
use crate::error::ComposerError;
use crate::prompt::{build_prompt, greeting_for_hour};
use crate::sanitize::sanitize_for_speech;

const MIN_MAX_TOKENS: u32 = 256;
const MAX_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone)]
pub struct ComposerSettings {
    /// Name the anchor introduces themself with in the opening line.
    pub anchor_name: String,
    pub temperature: f32,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            anchor_name: "Noah".to_string(),
            temperature: 0.7,
        }
    }
}

/// Completion budget for a target word count: two tokens per word, bounded.
#[must_use]
pub fn max_tokens_for(target_words: u32) -> u32 {
    target_words
        .saturating_mul(2)
        .clamp(MIN_MAX_TOKENS, MAX_MAX_TOKENS)
}

pub struct LlmComposer {
    client: OpenAiClient,
    settings: ComposerSettings,
}

impl LlmComposer {
    #[must_use]
    pub fn new(client: OpenAiClient, settings: ComposerSettings) -> Self {
        Self { client, settings }
    }

    /// Compose and clean one script.
    ///
    /// # Errors
    ///
    /// Propagates client errors, and returns
    /// [`ComposerError::EmptyCompletion`] when nothing speakable remains
    /// after cleanup.
    pub async fn compose_script(
        &self,
        brief: CompositionBrief<'_>,
    ) -> Result<Script, ComposerError> {
        let greeting = greeting_for_hour(Local::now().hour());
        let prompt = build_prompt(&brief, &self.settings.anchor_name, greeting);
        let max_tokens = max_tokens_for(brief.target_words);

        let raw = self
            .client
            .complete(
                &prompt.system,
                &prompt.user,
                self.settings.temperature,
                max_tokens,
            )
            .await?;

        let text = sanitize_for_speech(&raw);
        if text.is_empty() {
            return Err(ComposerError::EmptyCompletion);
        }

        let script = Script::new(text);
        tracing::info!(
            model = %self.client.model(),
            target_words = brief.target_words,
            script_words = script.word_count,
            articles = brief.articles.len(),
            "composed script"
        );
        Ok(script)
    }
}

#[async_trait]
impl ScriptComposer for LlmComposer {
    async fn compose(&self, brief: CompositionBrief<'_>) -> Result<Script, CompositionError> {
        self.compose_script(brief).await.map_err(|e| {
            tracing::warn!(error = %e, "script composition failed");
            CompositionError::from(e)
        })
    }
}
