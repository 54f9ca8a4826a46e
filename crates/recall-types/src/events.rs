use serde::{Deserialize, Serialize};

/// Events emitted while a turn runs
///
/// Wraps the provider's token events with the turn lifecycle: start, compaction,
/// grounding and end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Turn started
    InitStream {
        run_id: String,
        thread_id: String,
        timestamp: i64,
    },

    /// Older messages were folded into the rolling summary
    Compacted {
        retained_messages: usize,
    },

    /// Retrieved chunks included in the prompt
    Grounded {
        chunks: usize,
    },

    /// Response token from the model
    Message {
        content: String,
    },

    /// Model stream completed
    Done {
        #[serde(skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },

    /// Turn completed and the exchange was recorded
    EndStream {
        status: String,
        total_duration_ms: u64,
    },
}

impl From<recall_llm::StreamEvent> for StreamEvent {
    fn from(event: recall_llm::StreamEvent) -> Self {
        match event {
            recall_llm::StreamEvent::Message { content } => Self::Message { content },
            recall_llm::StreamEvent::Done { finish_reason } => Self::Done { finish_reason },
        }
    }
}
