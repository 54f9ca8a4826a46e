use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A policy value outside its allowed range
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid policy: {0}")]
pub struct PolicyError(pub String);

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    #[default]
    Fake,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    pub model: String,
    pub provider: Provider,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
}

impl LLMConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            provider: Provider::default(),
            temperature: None,
            max_tokens: None,
            base_url: None,
            embedding_model: None,
        }
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self::new("fake-llm")
    }
}

/// When to fold the conversation into the rolling summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MemoryPolicy {
    /// Summarize once the thread holds more messages than this
    pub summarize_threshold: usize,
    /// Messages kept verbatim after a summary
    pub retain_after_summary: usize,
    /// Model for the summary call; the turn model when unset
    pub summarization_model: Option<String>,
}

impl Default for MemoryPolicy {
    fn default() -> Self {
        Self {
            summarize_threshold: 6,
            retain_after_summary: 2,
            summarization_model: None,
        }
    }
}

impl MemoryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.summarize_threshold = threshold;
        self
    }

    pub fn with_retain(mut self, retain: usize) -> Self {
        self.retain_after_summary = retain;
        self
    }

    pub fn with_summarization_model(mut self, model: impl Into<String>) -> Self {
        self.summarization_model = Some(model.into());
        self
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.retain_after_summary == 0 {
            return Err(PolicyError(
                "retain_after_summary must be at least 1".to_string(),
            ));
        }
        if self.retain_after_summary >= self.summarize_threshold {
            return Err(PolicyError(format!(
                "retain_after_summary ({}) must be below summarize_threshold ({})",
                self.retain_after_summary, self.summarize_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrievalPolicy {
    pub enabled: bool,
    pub top_k: usize,
}

impl Default for RetrievalPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            top_k: 2,
        }
    }
}

impl RetrievalPolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.top_k == 0 {
            return Err(PolicyError("top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Character window used when splitting source text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 100,
            chunk_overlap: 50,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.chunk_size == 0 {
            return Err(PolicyError("chunk_size must be greater than 0".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(PolicyError(format!(
                "chunk_overlap ({}) must be below chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// How much recent history goes into the prompt
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextPolicy {
    #[default]
    AllMessages,
    LastK { k: usize },
    TokenBudget { max_tokens: usize },
}

/// Deployment-wide settings for the assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub llm: LLMConfig,
    pub memory: MemoryPolicy,
    pub retrieval: RetrievalPolicy,
    pub chunking: ChunkingConfig,
    pub context: ContextPolicy,
    /// Template used when a turn names none
    pub default_template: Option<String>,
}
