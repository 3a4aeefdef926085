// src/services/completion.rs
use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::AppError;

pub const MODEL: &str = "llama-3.3-70b-versatile";
pub const SYSTEM_PROMPT: &str = "Tu es un assistant utile, poli et concis.";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: String,
}

impl CompletionMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// The fixed two-message conversation sent for every user message.
    pub fn for_message(message: &str) -> Self {
        Self {
            model: MODEL.to_string(),
            messages: vec![
                CompletionMessage::system(SYSTEM_PROMPT),
                CompletionMessage::user(message),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// `null` entries are kept so that a null first candidate stays first.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub choices: Vec<Option<Choice>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Option<Choice>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Option<Choice>>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![Some(Choice {
                message: Some(ChoiceMessage { content: Some(text.into()) }),
            })],
        }
    }

    /// Text of the first candidate, if it has any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(Option::as_ref)
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|text| !text.is_empty())
    }
}

/// Sends a chat completion request to an upstream model provider.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AppError>;
}

/// OpenAI-compatible chat completion endpoint, Groq by default.
///
/// One attempt per call: no retries, and no timeout beyond reqwest's defaults.
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

impl GroqClient {
    pub fn new(api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, AppError> {
        debug!(url = %self.url, model = %request.model, "sending completion request");

        let response = self
            .client
            .post(&self.url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::Upstream { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_carries_fixed_parameters() {
        let value = serde_json::to_value(CompletionRequest::for_message("Bonjour")).unwrap();
        assert_eq!(value["model"], MODEL);
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(value["messages"][1], json!({"role": "user", "content": "Bonjour"}));
        let temperature = value["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn first_text_reads_first_candidate() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Salut !"}},
                {"index": 1, "message": {"role": "assistant", "content": "Coucou"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text(), Some("Salut !"));
    }

    #[test]
    fn first_text_is_none_without_usable_content() {
        let empty: CompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(empty.first_text(), None);

        let missing: CompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.first_text(), None);

        let null_content: CompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert_eq!(null_content.first_text(), None);

        assert_eq!(CompletionResponse::with_text("").first_text(), None);
    }

    #[test]
    fn null_choices_decode_as_no_candidate() {
        for body in [
            json!({"choices": null}),
            json!({"choices": [null]}),
            json!({"choices": [null, {"message": {"content": "second"}}]}),
            json!({"choices": [{"message": null}]}),
        ] {
            let response: CompletionResponse = serde_json::from_value(body.clone()).unwrap();
            assert_eq!(response.first_text(), None, "body: {body}");
        }
    }
}
