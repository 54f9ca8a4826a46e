//! Prelude module for convenient imports
//!
//! ```rust
//! use recall::prelude::*;
//! ```

pub use crate::{
    build_clients, AssistantConfig, ChatClient, ChunkingConfig, ContextPolicy, EmbeddingClient,
    InMemoryThreadStore, InMemoryVectorIndex, InputMessage, JsonRecordLoader, LLMConfig,
    MemoryPolicy, Message, Orchestrator, OrchestratorBuilder, Provider, RetrievalPolicy, Retriever,
    StreamEvent, TemplateRegistry, TextLoader, ThreadStore, TurnError, TurnOptions, TurnRequest,
};
