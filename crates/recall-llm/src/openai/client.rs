// OpenAI-specific client implementation

use crate::streaming::parse_chat_sse_stream;
use crate::traits::{
    ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenStream, TokenUsage,
};
use crate::types::{Content, ContentPart, Message};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Embedding model used when none is configured
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";

/// OpenAI client (HTTP direct, no SDK)
pub struct OpenAIClient {
    pub(super) http_client: reqwest::Client,
    pub(super) base_url: String,
    pub(super) embedding_model: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
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
            base_url: OPENAI_API_BASE.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        })
    }

    /// Point the client at an OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: Vec<Message>,
        options: &ChatOptions,
        stream: bool,
    ) -> Value {
        let openai_messages: Vec<Value> = messages
            .into_iter()
            .map(|msg| self.convert_message(msg))
            .collect();

        let mut request = serde_json::Map::new();
        request.insert("model".to_string(), serde_json::json!(model));
        request.insert("messages".to_string(), Value::Array(openai_messages));
        request.insert("stream".to_string(), serde_json::json!(stream));

        // Reasoning models use different parameter names
        let is_reasoning_model = model.starts_with("o1") || model.starts_with("gpt-5");

        if let Some(temp) = options.temperature {
            if !is_reasoning_model {
                request.insert("temperature".to_string(), serde_json::json!(temp));
            }
        }
        if let Some(max_tokens) = options.max_tokens {
            let token_field = if is_reasoning_model {
                "max_completion_tokens"
            } else {
                "max_tokens"
            };
            request.insert(token_field.to_string(), serde_json::json!(max_tokens));
        }

        Value::Object(request)
    }

    /// Convert our Message type to OpenAI format
    fn convert_message(&self, message: Message) -> Value {
        let role = message.role().to_string();
        let (content, name) = match message {
            Message::System { content, name } => (content, name),
            Message::Human { content, name } => (content, name),
            Message::AI { content, name } => (content, name),
        };

        let mut obj = serde_json::Map::new();
        obj.insert("role".to_string(), serde_json::json!(role));
        obj.insert("content".to_string(), self.convert_content(content));
        if let Some(name) = name {
            obj.insert("name".to_string(), serde_json::json!(name));
        }
        Value::Object(obj)
    }

    /// Convert Content to OpenAI format (string or array)
    fn convert_content(&self, content: Content) -> Value {
        match content {
            Content::Text(s) => serde_json::json!(s),
            Content::Parts(parts) => {
                let converted: Vec<Value> = parts
                    .into_iter()
                    .map(|ContentPart::Text { text }| {
                        serde_json::json!({
                            "type": "text",
                            "text": text,
                        })
                    })
                    .collect();
                serde_json::json!(converted)
            }
        }
    }

    async fn post_chat(&self, payload: &Value) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        Ok(response)
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(
            &request.model,
            request.messages,
            &request.options,
            false,
        );

        tracing::debug!(model = %request.model, "OpenAI chat request");
        let response = self.post_chat(&payload).await?;

        let raw: OpenAIChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        // Convert to provider-agnostic response
        let choice = raw.choices.first();
        Ok(ChatResponse {
            content: choice.and_then(|c| c.message.content.clone()),
            usage: Some(TokenUsage {
                input_tokens: raw.usage.prompt_tokens,
                output_tokens: raw.usage.completion_tokens,
                total_tokens: raw.usage.total_tokens,
            }),
            finish_reason: choice.and_then(|c| c.finish_reason.clone()),
            raw: serde_json::to_value(&raw)?,
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<TokenStream> {
        let payload = self.build_chat_request(
            &request.model,
            request.messages,
            &request.options,
            true,
        );

        tracing::debug!(model = %request.model, "OpenAI streaming chat request");
        let response = self.post_chat(&payload).await?;

        Ok(parse_chat_sse_stream(response))
    }
}

// ============================================================================
// OPENAI-SPECIFIC RESPONSE TYPES (for Chat Completions)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIChatResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    pub role: String,
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
    fn test_build_chat_request_payload() {
        let client = OpenAIClient::new("sk-test").unwrap();
        let payload = client.build_chat_request(
            "gpt-4o",
            vec![Message::system("be brief"), Message::human("hi")],
            &ChatOptions::new().temperature(0.8).max_tokens(64),
            true,
        );

        assert_eq!(payload["model"], "gpt-4o");
        assert_eq!(payload["stream"], true);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "hi");
        assert_eq!(payload["max_tokens"], 64);
        assert!(payload.get("temperature").is_some());
    }

    #[test]
    fn test_reasoning_models_use_completion_token_field() {
        let client = OpenAIClient::new("sk-test").unwrap();
        let payload = client.build_chat_request(
            "o1-mini",
            vec![Message::human("hi")],
            &ChatOptions::new().temperature(0.8).max_tokens(64),
            false,
        );

        assert!(payload.get("temperature").is_none());
        assert_eq!(payload["max_completion_tokens"], 64);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = OpenAIClient::new("sk-test")
            .unwrap()
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }
}
