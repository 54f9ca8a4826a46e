// Configuration layer for provider-agnostic client creation
// This module provides a factory pattern for creating chat and embedding clients from configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::fake::{FakeChatClient, FakeEmbeddingClient};
use crate::openai::OpenAIClient;
use crate::traits::{ChatClient, EmbeddingClient};

/// Type of model provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    OpenAI,
    Fake,
}

/// Configuration for OpenAI (or any OpenAI-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL for the API (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Embedding model (optional, defaults to text-embedding-3-large)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            embedding_model: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }

    fn build_client(self) -> Result<OpenAIClient> {
        let mut client = OpenAIClient::new(self.api_key)?;
        if let Some(base_url) = self.base_url {
            client = client.with_base_url(base_url);
        }
        if let Some(model) = self.embedding_model {
            client = client.with_embedding_model(model);
        }
        Ok(client)
    }
}

/// Provider-specific configuration details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderDetails {
    OpenAI(OpenAIConfig),
    Fake,
}

/// Complete provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(flatten)]
    pub details: ProviderDetails,
}

impl ProviderConfig {
    /// Create OpenAI provider config
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            details: ProviderDetails::OpenAI(OpenAIConfig::new(api_key)),
        }
    }

    pub fn from_openai(config: OpenAIConfig) -> Self {
        Self {
            details: ProviderDetails::OpenAI(config),
        }
    }

    /// Create the scripted in-process provider (`fake-llm`)
    pub fn fake() -> Self {
        Self {
            details: ProviderDetails::Fake,
        }
    }

    /// Get the provider type
    pub fn provider_type(&self) -> ProviderType {
        match self.details {
            ProviderDetails::OpenAI(_) => ProviderType::OpenAI,
            ProviderDetails::Fake => ProviderType::Fake,
        }
    }
}

/// Factory for creating clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a chat client from provider configuration
    pub fn create_chat_client(config: ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        match config.details {
            ProviderDetails::OpenAI(openai_config) => {
                Ok(Arc::new(openai_config.build_client()?))
            }
            ProviderDetails::Fake => Ok(Arc::new(FakeChatClient::new())),
        }
    }

    /// Create an embedding client from provider configuration
    pub fn create_embedding_client(config: ProviderConfig) -> Result<Arc<dyn EmbeddingClient>> {
        match config.details {
            ProviderDetails::OpenAI(openai_config) => {
                Ok(Arc::new(openai_config.build_client()?))
            }
            ProviderDetails::Fake => Ok(Arc::new(FakeEmbeddingClient::new())),
        }
    }
}
