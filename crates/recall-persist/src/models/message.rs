use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use recall_types::MessageRole;

/// Stored conversation message
///
/// Immutable once created. `created_order` is the only sequencing authority;
/// `created_at` is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_order: u64,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub(crate) fn new(role: MessageRole, content: impl Into<String>, created_order: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_order,
            created_at: Utc::now(),
        }
    }

    /// `role: content` line used in rendered history and summary prompts
    pub fn to_history_line(&self) -> String {
        format!("{}: {}", self.role, self.content)
    }
}

// Conversion: stored Message → recall_llm::Message
impl From<&Message> for recall_llm::Message {
    fn from(msg: &Message) -> Self {
        match msg.role {
            MessageRole::User => recall_llm::Message::human(msg.content.clone()),
            MessageRole::Assistant => recall_llm::Message::ai(msg.content.clone()),
            MessageRole::System => recall_llm::Message::system(msg.content.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_line() {
        let msg = Message::new(MessageRole::Assistant, "The mayor is Tanaka.", 3);
        assert_eq!(msg.to_history_line(), "assistant: The mayor is Tanaka.");
    }

    #[test]
    fn test_into_llm_message() {
        let msg = Message::new(MessageRole::User, "hi", 0);
        let llm: recall_llm::Message = (&msg).into();
        assert_eq!(llm, recall_llm::Message::human("hi"));
    }
}
