use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a template can draw on for one model call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptContext {
    pub question: String,
    /// Rendered `role: content` lines
    pub history: String,
    pub summary: Option<String>,
    pub retrieved_context: Vec<String>,
}

impl PromptContext {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = history.into();
        self
    }

    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_retrieved_context(mut self, context: Vec<String>) -> Self {
        self.retrieved_context = context;
        self
    }
}

/// Role-tagged message as received at the turn boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: MessageRole,
    pub content: String,
}

impl InputMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// One turn as delivered by a client
///
/// The last message is the question; anything before it is history the client
/// already holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    pub thread_id: String,
    pub messages: Vec<InputMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl TurnRequest {
    pub fn new(thread_id: impl Into<String>, messages: Vec<InputMessage>) -> Self {
        Self {
            thread_id: thread_id.into(),
            messages,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Split into `(history, question)` when the last message is from the user
    pub fn split_question(&self) -> Option<(&[InputMessage], &str)> {
        let (last, history) = self.messages.split_last()?;
        if last.role != MessageRole::User {
            return None;
        }
        Some((history, last.content.as_str()))
    }
}

/// Per-turn overrides of the deployment defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOptions {
    pub model: Option<String>,
    pub template: Option<String>,
    pub grounding: Option<bool>,
    pub top_k: Option<usize>,
}

impl TurnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_grounding(mut self, enabled: bool) -> Self {
        self.grounding = Some(enabled);
        self
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_question() {
        let request = TurnRequest::new(
            "t1",
            vec![
                InputMessage::user("hi"),
                InputMessage::assistant("hello"),
                InputMessage::user("who is the mayor?"),
            ],
        );

        let (history, question) = request.split_question().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(question, "who is the mayor?");
    }

    #[test]
    fn test_split_question_requires_trailing_user_message() {
        assert!(TurnRequest::new("t1", vec![]).split_question().is_none());
        assert!(TurnRequest::new("t1", vec![InputMessage::assistant("hi")])
            .split_question()
            .is_none());
    }

    #[test]
    fn test_turn_request_deserialize() {
        let request: TurnRequest = serde_json::from_str(
            r#"{"thread_id":"t1","messages":[{"role":"user","content":"hi"}],"model":"gpt-4o"}"#,
        )
        .unwrap();
        assert_eq!(request.model.as_deref(), Some("gpt-4o"));
        assert_eq!(request.messages[0].role, MessageRole::User);
    }

    #[test]
    fn test_prompt_context_drops_blank_summary() {
        let context = PromptContext::new("q").with_summary(Some("  ".to_string()));
        assert!(context.summary.is_none());
    }
}
