//! # Recall
//!
//! Conversational assistant that answers from a knowledge base and remembers
//! long conversations through a rolling summary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use recall::prelude::*;
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Fake provider: no credentials needed
//!     let clients = build_clients(&LLMConfig::default(), None)?;
//!
//!     let retriever = Arc::new(Retriever::new(
//!         clients.embeddings,
//!         Arc::new(InMemoryVectorIndex::new()),
//!     ));
//!     retriever
//!         .ingest("kato", "city: Kato\nmayor: Kazuo Yasuda", &ChunkingConfig::default())
//!         .await?;
//!
//!     let orchestrator = Orchestrator::builder()
//!         .chat_client(clients.chat)
//!         .retriever(retriever)
//!         .build()?;
//!
//!     let mut events = orchestrator.handle_turn("thread-1", "Who is the mayor?", TurnOptions::new())?;
//!     while let Some(event) = events.next().await {
//!         if let StreamEvent::Message { content } = event? {
//!             print!("{}", content);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`recall-graph`**: turn orchestration and streaming
//! - **`recall-llm`**: chat and embedding clients (OpenAI, scripted fakes)
//! - **`recall-persist`**: conversation threads
//! - **`recall-context`**: rolling-summary memory and history windows
//! - **`recall-rag`**: chunking, vector index, retrieval, knowledge loaders
//! - **`recall-prompt`**: prompt templates and assembly
//! - **`recall-types`**: shared configuration, events and turn types

pub mod prelude;

pub use recall_context as context;
pub use recall_graph as graph;
pub use recall_llm as llm;
pub use recall_persist as persist;
pub use recall_prompt as prompt;
pub use recall_rag as rag;
pub use recall_types as types;

pub use recall_graph::{
    build_clients, Orchestrator, OrchestratorBuilder, ProviderClients, TurnError, TurnStream,
};

pub use recall_llm::{
    ChatClient, ChatOptions, ChatRequest, Content, EmbeddingClient, FakeChatClient,
    FakeEmbeddingClient, Message, OpenAIClient,
};

pub use recall_types::{
    AssistantConfig, ChunkingConfig, ContextPolicy, InputMessage, LLMConfig, MemoryPolicy,
    PromptContext, Provider, RetrievalPolicy, StreamEvent, TurnOptions, TurnRequest,
};

pub use recall_persist::{ConversationThread, InMemoryThreadStore, MessageRole, PersistError, ThreadStore};

pub use recall_context::{HistoryWindow, MemoryController, MemoryError, MemoryState, MemoryTransition};

pub use recall_rag::{
    split, Chunk, Document, InMemoryVectorIndex, JsonRecordLoader, RagError, RetrievalResult,
    Retriever, TextLoader, VectorIndex,
};

pub use recall_prompt::{PromptAssembler, PromptError, PromptTemplate, TemplateRegistry};
