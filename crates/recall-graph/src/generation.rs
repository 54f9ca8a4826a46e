use std::sync::Arc;

use recall_llm::{ChatClient, ChatOptions, ChatRequest, Message, TokenStream};
use recall_types::LLMConfig;

use crate::error::{Result, TurnError};

/// Opens the user-facing model stream for an assembled prompt
pub struct Generator {
    client: Arc<dyn ChatClient>,
    config: LLMConfig,
}

impl Generator {
    pub fn new(client: Arc<dyn ChatClient>, config: LLMConfig) -> Self {
        Self { client, config }
    }

    fn options(&self) -> ChatOptions {
        let mut options = ChatOptions::new();
        if let Some(temp) = self.config.temperature {
            options = options.temperature(temp);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            options = options.max_tokens(max_tokens);
        }
        options
    }

    pub fn request(&self, model: &str, messages: Vec<Message>) -> ChatRequest {
        ChatRequest::new(model, messages).with_options(self.options())
    }

    pub async fn stream(&self, model: &str, messages: Vec<Message>) -> Result<TokenStream> {
        tracing::debug!(model = %model, messages = messages.len(), "Opening model stream");

        self.client
            .chat_stream(self.request(model, messages))
            .await
            .map_err(|e| TurnError::GenerationFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_llm::FakeChatClient;

    #[test]
    fn test_request_carries_options() {
        let config = LLMConfig::default().with_temperature(0.2).with_max_tokens(256);
        let generator = Generator::new(Arc::new(FakeChatClient::new()), config);

        let request = generator.request("gpt-4o-mini", vec![Message::human("hi")]);
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.options.temperature, Some(0.2));
        assert_eq!(request.options.max_tokens, Some(256));
    }

    #[tokio::test]
    async fn test_stream_start_failure_is_generation_failure() {
        let client = FakeChatClient::new();
        client.set_fail_stream_start(true);
        let generator = Generator::new(Arc::new(client), LLMConfig::default());

        let result = generator.stream("fake-llm", vec![Message::human("hi")]).await;
        assert!(matches!(result, Err(TurnError::GenerationFailure(_))));
    }
}
