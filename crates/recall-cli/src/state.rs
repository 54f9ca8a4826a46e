use anyhow::{Context, Result};
use std::sync::Arc;

use recall_graph::{build_clients, Orchestrator};
use recall_prompt::TemplateRegistry;
use recall_rag::{InMemoryVectorIndex, Retriever};

use crate::config::Config;
use crate::knowledge::ingest_all;

/// Everything the REPL needs, created once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub async fn build(config: Config) -> Result<Self> {
        let clients = build_clients(&config.llm, config.openai_api_key.as_deref())?;

        let templates = match &config.prompts.templates_path {
            Some(path) => TemplateRegistry::from_file(path).await?,
            None => TemplateRegistry::with_defaults(),
        };

        let mut builder = Orchestrator::builder()
            .chat_client(clients.chat)
            .templates(templates)
            .config(config.assistant());

        if config.retrieval.enabled {
            let retriever = Arc::new(Retriever::new(
                clients.embeddings,
                Arc::new(InMemoryVectorIndex::new()),
            ));
            ingest_all(&retriever, &config.knowledge, &config.chunking)
                .await
                .context("Failed to build the knowledge base")?;
            builder = builder.retriever(retriever);
        }

        Ok(Self {
            orchestrator: builder.build()?,
            config: Arc::new(config),
        })
    }
}
