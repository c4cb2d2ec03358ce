// OpenAI-compatible chat completions client (OpenAI, Groq, any /chat/completions host)

use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client against the OpenAI API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, OPENAI_API_BASE)
    }

    /// Create new client against any OpenAI-compatible base URL,
    /// e.g. `https://api.groq.com/openai/v1`
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build chat completion request payload
    fn build_chat_request(&self, model: &str, messages: &[Message], options: &ChatOptions) -> Value {
        let openai_messages: Vec<Value> = messages.iter().map(convert_message).collect();

        let mut request = Map::new();
        request.insert("model".to_string(), json!(model));
        request.insert("messages".to_string(), json!(openai_messages));
        request.insert("stream".to_string(), json!(false));

        if let Some(temp) = options.temperature {
            request.insert("temperature".to_string(), json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            request.insert("max_tokens".to_string(), json!(max_tokens));
        }

        Value::Object(request)
    }
}

/// Convert our Message type to OpenAI format
fn convert_message(message: &Message) -> Value {
    json!({
        "role": message.role(),
        "content": message.content(),
    })
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(&request.model, &request.messages, &request.options);

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Completion API error ({}): {}", status, error_text);
        }

        let raw: OpenAIChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let Some(choice) = raw.choices.first() else {
            anyhow::bail!("Completion API returned no choices");
        };
        Ok(ChatResponse {
            content: choice.message.content.clone(),
            usage: raw.usage.as_ref().map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason.clone(),
            raw: serde_json::to_value(&raw)?,
        })
    }
}

// ============================================================================
// CHAT COMPLETIONS WIRE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIChatResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    pub role: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OpenAIClient::with_base_url("key", "https://api.groq.com/openai/v1/").unwrap();
        assert_eq!(client.base_url(), "https://api.groq.com/openai/v1");
    }

    #[test]
    fn test_default_base_url() {
        let client = OpenAIClient::new("key").unwrap();
        assert_eq!(client.base_url(), OPENAI_API_BASE);
    }

    #[test]
    fn test_build_chat_request_payload() {
        let client = OpenAIClient::new("key").unwrap();
        let messages = vec![
            Message::system("rules"),
            Message::human("hi"),
            Message::ai("hello"),
        ];
        let options = ChatOptions::new().temperature(0.2).max_tokens(200);

        let payload = client.build_chat_request("llama-3.1-8b-instant", &messages, &options);

        assert_eq!(payload["model"], "llama-3.1-8b-instant");
        assert_eq!(payload["stream"], false);
        assert_eq!(payload["max_tokens"], 200);
        assert!((payload["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);

        let wire = payload["messages"].as_array().unwrap();
        assert_eq!(wire.len(), 3);
        assert_eq!(wire[0], json!({"role": "system", "content": "rules"}));
        assert_eq!(wire[1], json!({"role": "user", "content": "hi"}));
        assert_eq!(wire[2], json!({"role": "assistant", "content": "hello"}));
    }

    #[test]
    fn test_build_chat_request_omits_unset_options() {
        let client = OpenAIClient::new("key").unwrap();
        let payload = client.build_chat_request("m", &[Message::human("x")], &ChatOptions::default());

        assert!(payload.get("temperature").is_none());
        assert!(payload.get("max_tokens").is_none());
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let result = OpenAIClient::new("bad\nkey");
        assert!(result.is_err());
    }
}
