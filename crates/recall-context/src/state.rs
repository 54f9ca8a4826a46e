use recall_types::MemoryPolicy;
use std::fmt;

/// Per-turn memory decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryState {
    Conversing,
    Summarizing,
}

impl MemoryState {
    /// Summarize once the thread holds more than `summarize_threshold` messages
    pub fn decide(message_count: usize, policy: &MemoryPolicy) -> Self {
        if message_count > policy.summarize_threshold {
            Self::Summarizing
        } else {
            Self::Conversing
        }
    }
}

impl fmt::Display for MemoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conversing => f.write_str("CONVERSING"),
            Self::Summarizing => f.write_str("SUMMARIZING"),
        }
    }
}
