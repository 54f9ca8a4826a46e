use recall_persist::{Message, MessageRole};
use recall_types::ContextPolicy;
use tiktoken_rs::{cl100k_base, CoreBPE};

use crate::error::{MemoryError, Result};

/// Recent-history selection for the prompt
///
/// When the policy cuts older messages off, the window is advanced to the first
/// user message so it never opens mid-exchange.
pub struct HistoryWindow {
    policy: ContextPolicy,
    bpe: Option<CoreBPE>,
}

impl HistoryWindow {
    pub fn new(policy: ContextPolicy) -> Result<Self> {
        let bpe = match policy {
            ContextPolicy::TokenBudget { .. } => Some(
                cl100k_base().map_err(|e| MemoryError::Tokenizer(e.to_string()))?,
            ),
            _ => None,
        };
        Ok(Self { policy, bpe })
    }

    pub fn policy(&self) -> &ContextPolicy {
        &self.policy
    }

    fn count_tokens(&self, message: &Message) -> usize {
        match &self.bpe {
            Some(bpe) => bpe.encode_with_special_tokens(&message.content).len(),
            None => 0,
        }
    }

    pub fn select<'a>(&self, messages: &'a [Message]) -> &'a [Message] {
        let mut start = match self.policy {
            ContextPolicy::AllMessages => 0,
            ContextPolicy::LastK { k } => messages.len().saturating_sub(k),
            ContextPolicy::TokenBudget { max_tokens } => {
                let mut used = 0;
                let mut start = messages.len();
                for (i, message) in messages.iter().enumerate().rev() {
                    used += self.count_tokens(message);
                    if used > max_tokens {
                        break;
                    }
                    start = i;
                }
                start
            }
        };

        if start > 0 {
            while start < messages.len() && messages[start].role != MessageRole::User {
                start += 1;
            }
        }

        &messages[start..]
    }
}

/// Render messages as `role: content` lines joined by newlines
pub fn format_history(messages: &[Message]) -> String {
    messages
        .iter()
        .map(Message::to_history_line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_persist::{InMemoryThreadStore, ThreadStore};

    async fn conversation(turns: &[(MessageRole, &str)]) -> Vec<Message> {
        let store = InMemoryThreadStore::new();
        for (role, content) in turns {
            store.append("t", *role, content.to_string()).await.unwrap();
        }
        store.get("t").await.unwrap().messages
    }

    #[tokio::test]
    async fn test_all_messages_keeps_everything() {
        let messages = conversation(&[
            (MessageRole::Assistant, "earlier answer"),
            (MessageRole::User, "q"),
        ])
        .await;

        let window = HistoryWindow::new(ContextPolicy::AllMessages).unwrap();
        assert_eq!(window.select(&messages).len(), 2);
    }

    #[tokio::test]
    async fn test_last_k_starts_on_user() {
        let messages = conversation(&[
            (MessageRole::User, "q1"),
            (MessageRole::Assistant, "a1"),
            (MessageRole::User, "q2"),
            (MessageRole::Assistant, "a2"),
        ])
        .await;

        let window = HistoryWindow::new(ContextPolicy::LastK { k: 3 }).unwrap();
        let selected = window.select(&messages);

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].content, "q2");
    }

    #[tokio::test]
    async fn test_token_budget() {
        let messages = conversation(&[
            (MessageRole::User, "a fairly long opening question about the city of Kato"),
            (MessageRole::Assistant, "a fairly long answer about the population of Kato"),
            (MessageRole::User, "mayor?"),
            (MessageRole::Assistant, "Tanaka."),
        ])
        .await;

        let window = HistoryWindow::new(ContextPolicy::TokenBudget { max_tokens: 8 }).unwrap();
        let selected = window.select(&messages);

        assert_eq!(format_history(selected), "user: mayor?\nassistant: Tanaka.");
    }

    #[test]
    fn test_format_history_empty() {
        assert_eq!(format_history(&[]), "");
    }
}
