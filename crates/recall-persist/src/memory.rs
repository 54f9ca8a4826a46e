use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::error::{PersistError, Result};
use crate::models::{ConversationThread, Message, MessageRole};
use crate::store::ThreadStore;

type ThreadSlot = Arc<Mutex<ConversationThread>>;

/// Process-lifetime thread store
///
/// The outer map is only write-locked to insert or remove a thread; each thread
/// carries its own lock so work on different threads proceeds independently.
#[derive(Default)]
pub struct InMemoryThreadStore {
    threads: RwLock<HashMap<String, ThreadSlot>>,
}

impl InMemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_id(thread_id: &str) -> Result<()> {
        if thread_id.trim().is_empty() {
            return Err(PersistError::InvalidThreadId(thread_id.to_string()));
        }
        Ok(())
    }

    /// Existing slot, or a new empty thread inserted under the write lock
    async fn slot(&self, thread_id: &str) -> Result<ThreadSlot> {
        Self::check_id(thread_id)?;

        if let Some(slot) = self.threads.read().await.get(thread_id) {
            return Ok(Arc::clone(slot));
        }

        let mut threads = self.threads.write().await;
        let slot = threads.entry(thread_id.to_string()).or_insert_with(|| {
            tracing::debug!(thread_id = %thread_id, "Creating thread");
            Arc::new(Mutex::new(ConversationThread::new(thread_id)))
        });
        Ok(Arc::clone(slot))
    }
}

#[async_trait]
impl ThreadStore for InMemoryThreadStore {
    async fn get(&self, thread_id: &str) -> Result<ConversationThread> {
        let slot = self.slot(thread_id).await?;
        let thread = slot.lock().await;
        Ok(thread.clone())
    }

    async fn append(&self, thread_id: &str, role: MessageRole, content: String) -> Result<Message> {
        let slot = self.slot(thread_id).await?;
        let mut thread = slot.lock().await;
        let message = thread.push(role, content);

        tracing::debug!(
            thread_id = %thread_id,
            role = %role,
            order = message.created_order,
            "Appended message"
        );
        Ok(message)
    }

    async fn replace(&self, thread_id: &str, summary: String, messages: Vec<Message>) -> Result<()> {
        Self::check_id(thread_id)?;

        let slot = self
            .threads
            .read()
            .await
            .get(thread_id)
            .cloned()
            .ok_or_else(|| PersistError::ThreadNotFound(thread_id.to_string()))?;

        if messages
            .windows(2)
            .any(|pair| pair[0].created_order >= pair[1].created_order)
        {
            return Err(PersistError::UnorderedMessages(thread_id.to_string()));
        }

        let mut thread = slot.lock().await;
        let dropped = thread.messages.len().saturating_sub(messages.len());
        thread.summary = Some(summary);
        thread.messages = messages;

        tracing::debug!(
            thread_id = %thread_id,
            retained = thread.messages.len(),
            dropped,
            "Replaced thread messages with summary"
        );
        Ok(())
    }

    async fn delete(&self, thread_id: &str) -> Result<bool> {
        let removed = self.threads.write().await.remove(thread_id).is_some();
        if removed {
            tracing::info!(thread_id = %thread_id, "Deleted thread");
        }
        Ok(removed)
    }

    async fn thread_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.threads.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_creates_empty_thread_once() {
        let store = InMemoryThreadStore::new();

        let first = store.get("t1").await.unwrap();
        let second = store.get("t1").await.unwrap();

        assert!(first.is_empty());
        assert_eq!(first, second);
        assert_eq!(store.thread_ids().await.unwrap(), vec!["t1".to_string()]);
    }

    #[tokio::test]
    async fn test_blank_thread_id_rejected() {
        let store = InMemoryThreadStore::new();
        assert_eq!(
            store.get("  ").await,
            Err(PersistError::InvalidThreadId("  ".to_string()))
        );
    }

    #[tokio::test]
    async fn test_replace_unknown_thread() {
        let store = InMemoryThreadStore::new();
        let result = store.replace("nope", "summary".to_string(), vec![]).await;
        assert_eq!(result, Err(PersistError::ThreadNotFound("nope".to_string())));
    }

    #[tokio::test]
    async fn test_replace_rejects_unordered_messages() {
        let store = InMemoryThreadStore::new();
        let a = store.append("t1", MessageRole::User, "a".into()).await.unwrap();
        let b = store.append("t1", MessageRole::Assistant, "b".into()).await.unwrap();

        let result = store.replace("t1", "s".to_string(), vec![b, a]).await;
        assert!(matches!(result, Err(PersistError::UnorderedMessages(_))));

        // Nothing changed
        let thread = store.get("t1").await.unwrap();
        assert_eq!(thread.messages.len(), 2);
        assert!(thread.summary.is_none());
    }
}
