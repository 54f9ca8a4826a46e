use std::sync::Arc;

use recall_llm::{ChatClient, ClientFactory, EmbeddingClient, OpenAIConfig, ProviderConfig};
use recall_types::{LLMConfig, Provider};

use crate::error::{Result, TurnError};

/// Chat and embedding clients for one deployment
#[derive(Clone)]
pub struct ProviderClients {
    pub chat: Arc<dyn ChatClient>,
    pub embeddings: Arc<dyn EmbeddingClient>,
}

/// Map the deployment's `LLMConfig` onto a provider configuration
///
/// The fake provider needs no key; OpenAI without one is rejected.
pub fn provider_config(config: &LLMConfig, api_key: Option<&str>) -> Result<ProviderConfig> {
    match config.provider {
        Provider::Fake => Ok(ProviderConfig::fake()),
        Provider::OpenAI => {
            let api_key = api_key
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    TurnError::InvalidParameter(
                        "the openai provider requires OPENAI_API_KEY".to_string(),
                    )
                })?;

            let mut openai = OpenAIConfig::new(api_key);
            if let Some(base_url) = &config.base_url {
                openai = openai.with_base_url(base_url.clone());
            }
            if let Some(model) = &config.embedding_model {
                openai = openai.with_embedding_model(model.clone());
            }
            Ok(ProviderConfig::from_openai(openai))
        }
    }
}

pub fn build_clients(config: &LLMConfig, api_key: Option<&str>) -> Result<ProviderClients> {
    let provider = provider_config(config, api_key)?;

    let chat = ClientFactory::create_chat_client(provider.clone())
        .map_err(|e| TurnError::InvalidParameter(e.to_string()))?;
    let embeddings = ClientFactory::create_embedding_client(provider)
        .map_err(|e| TurnError::InvalidParameter(e.to_string()))?;

    tracing::info!(
        provider = ?config.provider,
        model = %config.model,
        "Provider clients ready"
    );

    Ok(ProviderClients { chat, embeddings })
}
