pub mod config;
pub mod events;
pub mod state;

pub use config::{
    AssistantConfig, ChunkingConfig, ContextPolicy, LLMConfig, MemoryPolicy, PolicyError,
    Provider, RetrievalPolicy,
};
pub use events::StreamEvent;
pub use state::{InputMessage, MessageRole, PromptContext, TurnOptions, TurnRequest};
