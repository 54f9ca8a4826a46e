use std::sync::Arc;

use recall_context::{HistoryWindow, MemoryController};
use recall_llm::ChatClient;
use recall_persist::{InMemoryThreadStore, ThreadStore};
use recall_prompt::{PromptAssembler, TemplateRegistry};
use recall_rag::Retriever;
use recall_types::AssistantConfig;

use crate::error::{Result, TurnError};
use crate::generation::Generator;
use crate::orchestrator::{Inner, Orchestrator};
use crate::turns::TurnGate;

/// Builder for an [`Orchestrator`] with optional collaborators
///
/// Only the chat client is required. Without a store an in-memory one is used,
/// without templates the built-in ones, and without a retriever every turn is
/// ungrounded.
pub struct OrchestratorBuilder {
    chat_client: Option<Arc<dyn ChatClient>>,
    store: Option<Arc<dyn ThreadStore>>,
    retriever: Option<Arc<Retriever>>,
    templates: Option<TemplateRegistry>,
    config: AssistantConfig,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            chat_client: None,
            store: None,
            retriever: None,
            templates: None,
            config: AssistantConfig::default(),
        }
    }

    /// Model used for both answers and summaries
    pub fn chat_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.chat_client = Some(client);
        self
    }

    pub fn store(mut self, store: Arc<dyn ThreadStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn retriever(mut self, retriever: Arc<Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn templates(mut self, templates: TemplateRegistry) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn config(mut self, config: AssistantConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Orchestrator> {
        let chat_client = self
            .chat_client
            .ok_or_else(|| TurnError::InvalidParameter("a chat client is required".to_string()))?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryThreadStore::new()));
        let config = self.config;

        config
            .retrieval
            .validate()
            .map_err(|e| TurnError::InvalidParameter(e.to_string()))?;
        config
            .chunking
            .validate()
            .map_err(|e| TurnError::InvalidParameter(e.to_string()))?;

        let memory = MemoryController::new(
            Arc::clone(&chat_client),
            Arc::clone(&store),
            config.memory.clone(),
        )
        .map_err(|e| TurnError::InvalidParameter(e.to_string()))?;

        let window = HistoryWindow::new(config.context.clone())
            .map_err(|e| TurnError::InvalidParameter(e.to_string()))?;

        let templates = self.templates.unwrap_or_else(TemplateRegistry::with_defaults);
        if let Some(name) = &config.default_template {
            templates.get(name)?;
        }

        tracing::info!(
            model = %config.llm.model,
            templates = templates.len(),
            grounded = self.retriever.is_some() && config.retrieval.enabled,
            summarize_threshold = config.memory.summarize_threshold,
            "Orchestrator ready"
        );

        Ok(Orchestrator::from_parts(Inner {
            generator: Generator::new(chat_client, config.llm.clone()),
            store,
            memory,
            retriever: self.retriever,
            assembler: PromptAssembler::new(Arc::new(templates)),
            window,
            config,
            gate: TurnGate::new(),
        }))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_llm::FakeChatClient;
    use recall_types::MemoryPolicy;

    #[test]
    fn test_chat_client_required() {
        assert!(matches!(
            OrchestratorBuilder::new().build(),
            Err(TurnError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_memory_policy() {
        let config = AssistantConfig {
            memory: MemoryPolicy::new().with_retain(0),
            ..AssistantConfig::default()
        };
        let result = Orchestrator::builder()
            .chat_client(Arc::new(FakeChatClient::new()))
            .config(config)
            .build();
        assert!(matches!(result, Err(TurnError::InvalidParameter(_))));
    }

    #[test]
    fn test_rejects_unknown_default_template() {
        let config = AssistantConfig {
            default_template: Some("missing".to_string()),
            ..AssistantConfig::default()
        };
        let result = Orchestrator::builder()
            .chat_client(Arc::new(FakeChatClient::new()))
            .config(config)
            .build();
        assert_eq!(
            result.err(),
            Some(TurnError::TemplateNotFound("missing".to_string()))
        );
    }
}
