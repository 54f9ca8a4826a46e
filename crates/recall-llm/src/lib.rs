pub mod types;
pub mod traits;
pub mod streaming;
pub mod openai;
pub mod config;
pub mod fake;

pub use traits::{
    ChatClient,
    EmbeddingClient,
    ChatRequest, ChatResponse, ChatOptions,
    TokenUsage,
    TokenStream,
};

pub use streaming::StreamEvent;
pub use openai::OpenAIClient;
pub use config::{ClientFactory, ProviderConfig, ProviderDetails, ProviderType, OpenAIConfig};
pub use fake::{FakeChatClient, FakeEmbeddingClient};
pub use types::{Message, Content};
