use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ConversationThread, Message, MessageRole};

/// Mapping from thread id to conversation state
///
/// Operations on one thread id are serialized relative to each other;
/// different thread ids never contend beyond the map lookup.
#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// Snapshot of the thread, creating an empty one on first access
    async fn get(&self, thread_id: &str) -> Result<ConversationThread>;

    /// Append a message and return it with its assigned id and order
    async fn append(&self, thread_id: &str, role: MessageRole, content: String) -> Result<Message>;

    /// Swap in a new summary and retained messages in one step
    async fn replace(&self, thread_id: &str, summary: String, messages: Vec<Message>) -> Result<()>;

    /// Drop a thread; returns whether it existed
    async fn delete(&self, thread_id: &str) -> Result<bool>;

    /// Ids of all known threads, sorted
    async fn thread_ids(&self) -> Result<Vec<String>>;
}
