use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use slotwise_core::intent::{IntentExtractor, IntentPrompt, RawIntent};
use slotwise_domain::{LlmConfig, Result, SlotwiseError};
use tracing::debug;

use super::prompt;
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, JsonSchema, ResponseFormat,
};
use crate::http::HttpClient;

const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_TEMPERATURE: f32 = 0.3;

const SYSTEM_MESSAGE: &str = "You are a scheduling assistant that converts \
natural-language availability requests into concrete time windows. Always \
answer with a single JSON object and nothing else.";

/// Chat-completions client for intent extraction.
///
/// One attempt per request, bounded by the configured timeout. Retrying here
/// would eat into the fallback chain's budget, so failures surface
/// immediately and the resolver degrades instead.
pub struct OpenAiIntentClient {
    http_client: HttpClient,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAiIntentClient {
    pub fn new(api_key: String, http_client: HttpClient) -> Self {
        Self {
            http_client,
            api_key,
            model: LlmConfig::default().model,
            api_url: LlmConfig::default().api_url,
        }
    }

    /// Build a client from configuration, including its timeout.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .max_attempts(1)
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_url: config.api_url.clone(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    fn build_request(&self, prompt: &IntentPrompt) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: SYSTEM_MESSAGE.to_string() },
                ChatMessage { role: "user".to_string(), content: prompt::render(prompt) },
            ],
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: Some(JsonSchema {
                    name: "availability_intent".to_string(),
                    schema: json!({
                        "type": "object",
                        "properties": {
                            "startTime": { "type": "string" },
                            "endTime": { "type": "string" },
                            "interpretation": { "type": "string" },
                            "confidence": {
                                "type": "number",
                                "minimum": 0.0,
                                "maximum": 1.0
                            }
                        },
                        "required": ["startTime", "endTime", "interpretation", "confidence"],
                        "additionalProperties": false
                    }),
                    strict: Some(true),
                }),
            },
        }
    }
}

#[async_trait]
impl IntentExtractor for OpenAiIntentClient {
    async fn extract(&self, prompt: &IntentPrompt) -> Result<RawIntent> {
        let payload = self.build_request(prompt);

        let request_builder = self
            .http_client
            .request(Method::POST, &self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload);

        let response = self.http_client.send(request_builder).await?;

        let status = response.status();
        debug!(status = status.as_u16(), "received language service response");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(match status.as_u16() {
                401 | 403 => {
                    SlotwiseError::Config(format!("language service rejected the API key ({status})"))
                }
                _ => SlotwiseError::Network(format!(
                    "language service error (status {status}): {message}"
                )),
            });
        }

        let chat_response: ChatCompletionResponse = response.json().await.map_err(|e| {
            SlotwiseError::Network(format!("failed to parse language service response: {e}"))
        })?;

        let choice = chat_response.choices.first().ok_or_else(|| {
            SlotwiseError::Network("language service response contained no choices".to_string())
        })?;

        let content = &choice.message.content;
        let object = extract_json_object(content).ok_or_else(|| {
            SlotwiseError::Network(format!("no JSON object in language service answer: {content}"))
        })?;

        serde_json::from_str(object).map_err(|e| {
            SlotwiseError::Network(format!("malformed intent candidate: {e}. Content: {object}"))
        })
    }
}

/// Locate the first complete JSON object inside `text`. Models occasionally
/// wrap the object in prose or code fences even when told not to.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
