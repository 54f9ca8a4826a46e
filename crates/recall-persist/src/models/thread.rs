use serde::{Deserialize, Serialize};

use super::message::{Message, MessageRole};

/// Memory state of one conversation
///
/// `summary`, when present, covers every message older than the oldest one
/// still in `messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationThread {
    pub thread_id: String,
    pub messages: Vec<Message>,
    pub summary: Option<String>,
    #[serde(default)]
    next_order: u64,
}

impl ConversationThread {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            messages: Vec::new(),
            summary: None,
            next_order: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.summary.is_none()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Append with the next creation order; orders keep increasing across compactions
    pub(crate) fn push(&mut self, role: MessageRole, content: impl Into<String>) -> Message {
        let message = Message::new(role, content, self.next_order);
        self.next_order += 1;
        self.messages.push(message.clone());
        message
    }

    /// Render all messages as `role: content` lines
    pub fn history_text(&self) -> String {
        self.messages
            .iter()
            .map(Message::to_history_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_increasing_order() {
        let mut thread = ConversationThread::new("t1");
        let a = thread.push(MessageRole::User, "hi");
        let b = thread.push(MessageRole::Assistant, "hello");

        assert!(a.created_order < b.created_order);
        assert_eq!(thread.history_text(), "user: hi\nassistant: hello");
    }
}
