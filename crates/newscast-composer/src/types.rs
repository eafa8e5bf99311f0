//! Wire types for the chat-completions endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatReply,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatReply {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_content_deserializes_as_none() {
        let json = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[test]
    fn missing_choices_defaults_empty() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(parsed.choices.is_empty());
    }
}
