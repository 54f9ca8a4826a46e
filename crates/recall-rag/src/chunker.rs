use recall_types::ChunkingConfig;
use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Bounded slice of a source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub source_id: String,
    pub text: String,
    pub position: usize,
}

impl Chunk {
    /// Stable identity used as the index key
    pub fn id(&self) -> String {
        format!("{}#{}", self.source_id, self.position)
    }
}

/// Split `text` into windows of at most `chunk_size` characters
///
/// Consecutive chunks share exactly `chunk_overlap` characters; the last chunk
/// may be shorter. Counting is by `char`, never by byte.
pub fn split(
    source_id: &str,
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<Chunk>> {
    ChunkingConfig::new(chunk_size, chunk_overlap)
        .validate()
        .map_err(|e| RagError::InvalidParameter(e.to_string()))?;

    let chars: Vec<char> = text.chars().collect();
    let total_chars = chars.len();
    let step = chunk_size - chunk_overlap;

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total_chars {
        let end = (start + chunk_size).min(total_chars);

        chunks.push(Chunk {
            source_id: source_id.to_string(),
            text: chars[start..end].iter().collect(),
            position: chunks.len(),
        });

        if end == total_chars {
            break;
        }
        start += step;
    }

    Ok(chunks)
}

/// Chunker bound to one configuration
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| RagError::InvalidParameter(e.to_string()))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> ChunkingConfig {
        self.config
    }

    pub fn split(&self, source_id: &str, text: &str) -> Result<Vec<Chunk>> {
        split(source_id, text, self.config.chunk_size, self.config.chunk_overlap)
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }
}
