use std::sync::Arc;

use recall_llm::{ChatClient, ChatRequest, Message as LLMMessage};
use recall_persist::{ConversationThread, ThreadStore};
use recall_types::MemoryPolicy;

use crate::error::{MemoryError, Result};
use crate::state::MemoryState;
use crate::templates::summarization_instruction;

/// Outcome of one memory evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryTransition {
    /// Below the threshold; nothing changed
    Continued,
    /// Older messages were folded into `summary`
    Summarized { summary: String, retained: usize },
}

/// Decides per turn whether to keep conversing or compact the thread
pub struct MemoryController {
    llm_client: Arc<dyn ChatClient>,
    store: Arc<dyn ThreadStore>,
    policy: MemoryPolicy,
}

impl MemoryController {
    pub fn new(
        llm_client: Arc<dyn ChatClient>,
        store: Arc<dyn ThreadStore>,
        policy: MemoryPolicy,
    ) -> Result<Self> {
        policy
            .validate()
            .map_err(|e| MemoryError::InvalidPolicy(e.to_string()))?;

        Ok(Self {
            llm_client,
            store,
            policy,
        })
    }

    pub fn policy(&self) -> &MemoryPolicy {
        &self.policy
    }

    /// Evaluate the thread once for the incoming turn
    ///
    /// `turn_model` is used for the summary call unless the policy names one.
    /// On failure the thread keeps its pre-summarization messages.
    pub async fn on_turn(&self, thread_id: &str, turn_model: &str) -> Result<MemoryTransition> {
        // 1. Read current state
        let thread = self.store.get(thread_id).await?;

        // 2. Decide
        let state = MemoryState::decide(thread.len(), &self.policy);
        if state == MemoryState::Conversing {
            return Ok(MemoryTransition::Continued);
        }

        tracing::info!(
            thread_id = %thread_id,
            messages = thread.len(),
            threshold = self.policy.summarize_threshold,
            "{} -> {}",
            MemoryState::Conversing,
            MemoryState::Summarizing
        );

        // 3. Summarize everything currently held
        let model = self
            .policy
            .summarization_model
            .as_deref()
            .unwrap_or(turn_model);
        let summary = self.summarize(&thread, model).await?;

        // 4. Keep only the most recent messages verbatim
        let retain = self.policy.retain_after_summary.min(thread.len());
        let retained = thread.messages[thread.len() - retain..].to_vec();

        self.store
            .replace(thread_id, summary.clone(), retained)
            .await?;

        tracing::info!(
            thread_id = %thread_id,
            retained = retain,
            summary_chars = summary.len(),
            "{} -> {}",
            MemoryState::Summarizing,
            MemoryState::Conversing
        );

        Ok(MemoryTransition::Summarized {
            summary,
            retained: retain,
        })
    }

    /// Single-shot summary of the thread, instruction appended after the conversation
    async fn summarize(&self, thread: &ConversationThread, model: &str) -> Result<String> {
        let mut messages: Vec<LLMMessage> = thread.messages.iter().map(Into::into).collect();
        messages.push(LLMMessage::system(summarization_instruction(
            thread.summary.as_deref(),
        )));

        let response = self
            .llm_client
            .chat(ChatRequest::new(model, messages))
            .await
            .map_err(|e| MemoryError::SummarizationFailure(e.to_string()))?;

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            _ => Err(MemoryError::SummarizationFailure(
                "model returned an empty summary".to_string(),
            )),
        }
    }
}
