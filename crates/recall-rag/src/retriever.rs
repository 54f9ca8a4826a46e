use std::collections::HashMap;
use std::sync::Arc;

use recall_llm::EmbeddingClient;
use recall_types::ChunkingConfig;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::chunker::{split, Chunk};
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// One ranked hit for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub chunk_text: String,
    pub score: f32,
    /// 1-based
    pub rank: usize,
    pub source_id: String,
}

struct IndexedChunk {
    chunk: Chunk,
    ordinal: u64,
}

#[derive(Default)]
struct Catalog {
    chunks: HashMap<String, IndexedChunk>,
    next_ordinal: u64,
}

/// Embeds queries and ranks indexed chunks against them
pub struct Retriever {
    embedder: Arc<dyn EmbeddingClient>,
    index: Arc<dyn VectorIndex>,
    catalog: RwLock<Catalog>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingClient>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedder,
            index,
            catalog: RwLock::new(Catalog::default()),
        }
    }

    /// Number of distinct chunks indexed
    pub async fn len(&self) -> usize {
        self.catalog.read().await.chunks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Embed and upsert chunks, keyed by chunk identity
    ///
    /// Re-indexing a known chunk replaces its vector but keeps its original
    /// position for tie-breaking.
    pub async fn index(&self, chunks: Vec<Chunk>) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| RagError::IndexUnavailable(e.to_string()))?;

        if vectors.len() != chunks.len() {
            return Err(RagError::IndexUnavailable(format!(
                "embedding count mismatch: {} chunks, {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        for (chunk, vector) in chunks.into_iter().zip(vectors) {
            let id = chunk.id();
            let metadata = serde_json::json!({
                "source_id": chunk.source_id,
                "position": chunk.position,
                "text": chunk.text,
            });

            self.index
                .upsert(&id, vector, metadata)
                .await
                .map_err(|e| RagError::IndexUnavailable(e.to_string()))?;

            let mut catalog = self.catalog.write().await;
            let ordinal = match catalog.chunks.get(&id) {
                Some(existing) => existing.ordinal,
                None => {
                    let ordinal = catalog.next_ordinal;
                    catalog.next_ordinal += 1;
                    ordinal
                }
            };
            catalog.chunks.insert(id, IndexedChunk { chunk, ordinal });
        }

        Ok(())
    }

    /// Split a source document and index its chunks; returns the chunk count
    pub async fn ingest(&self, source_id: &str, text: &str, config: &ChunkingConfig) -> Result<usize> {
        let chunks = split(source_id, text, config.chunk_size, config.chunk_overlap)?;
        let count = chunks.len();
        self.index(chunks).await?;

        tracing::info!(source_id = %source_id, chunks = count, "Ingested document");
        Ok(count)
    }

    /// Top `k` chunks for `text`, highest score first, ties in index order
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievalResult>> {
        if k == 0 {
            return Err(RagError::InvalidParameter("k must be at least 1".to_string()));
        }
        if self.is_empty().await {
            return Ok(Vec::new());
        }

        let vector = self
            .embedder
            .embed(text)
            .await
            .map_err(|e| RagError::IndexUnavailable(e.to_string()))?;

        let hits = self
            .index
            .query(&vector, k)
            .await
            .map_err(|e| RagError::IndexUnavailable(e.to_string()))?;

        let catalog = self.catalog.read().await;
        let mut ranked: Vec<(&IndexedChunk, f32)> = hits
            .iter()
            .filter_map(|(id, score)| match catalog.chunks.get(id) {
                Some(indexed) => Some((indexed, *score)),
                None => {
                    tracing::warn!(id = %id, "Index returned an unknown chunk id");
                    None
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.ordinal.cmp(&b.0.ordinal))
        });
        ranked.truncate(k);

        let results: Vec<RetrievalResult> = ranked
            .into_iter()
            .enumerate()
            .map(|(i, (indexed, score))| {
                tracing::debug!(
                    rank = i + 1,
                    score,
                    chunk = %indexed.chunk.id(),
                    "Retrieved chunk"
                );
                RetrievalResult {
                    chunk_text: indexed.chunk.text.clone(),
                    score,
                    rank: i + 1,
                    source_id: indexed.chunk.source_id.clone(),
                }
            })
            .collect();

        Ok(results)
    }
}
