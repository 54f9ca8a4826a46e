use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Vector service contract
///
/// `query` returns `(id, score)` pairs, highest score first, at most `k` of them.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, id: &str, vector: Vec<f32>, metadata: serde_json::Value) -> Result<()>;

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<(String, f32)>>;

    async fn len(&self) -> Result<usize>;
}

/// Calculates cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

struct IndexEntry {
    id: String,
    vector: Vec<f32>,
    metadata: serde_json::Value,
}

#[derive(Default)]
struct Entries {
    items: Vec<IndexEntry>,
    positions: HashMap<String, usize>,
}

/// In-process index scanned linearly with cosine similarity
///
/// Entries keep their first-insertion order and equal scores are returned in
/// that order.
#[derive(Default)]
pub struct InMemoryVectorIndex {
    entries: RwLock<Entries>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata stored with `id`
    pub async fn metadata(&self, id: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().await;
        let pos = *entries.positions.get(id)?;
        Some(entries.items[pos].metadata.clone())
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, id: &str, vector: Vec<f32>, metadata: serde_json::Value) -> Result<()> {
        let mut entries = self.entries.write().await;

        match entries.positions.get(id).copied() {
            Some(pos) => {
                let entry = &mut entries.items[pos];
                entry.vector = vector;
                entry.metadata = metadata;
            }
            None => {
                let pos = entries.items.len();
                entries.items.push(IndexEntry {
                    id: id.to_string(),
                    vector,
                    metadata,
                });
                entries.positions.insert(id.to_string(), pos);
            }
        }
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<(String, f32)>> {
        let entries = self.entries.read().await;

        let mut scored: Vec<(String, f32)> = entries
            .items
            .iter()
            .map(|entry| (entry.id.clone(), cosine_similarity(vector, &entry.vector)))
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        tracing::debug!(candidates = entries.items.len(), k, "In-memory vector query");
        Ok(scored)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().await.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let index = InMemoryVectorIndex::new();
        index.upsert("a", vec![1.0, 0.0], serde_json::Value::Null).await.unwrap();
        index.upsert("b", vec![0.0, 1.0], serde_json::Value::Null).await.unwrap();
        index.upsert("a", vec![0.0, 1.0], serde_json::json!({"v": 2})).await.unwrap();

        assert_eq!(index.len().await.unwrap(), 2);
        assert_eq!(index.metadata("a").await, Some(serde_json::json!({"v": 2})));

        // Equal scores: first-inserted id first
        let results = index.query(&[0.0, 1.0], 2).await.unwrap();
        assert_eq!(results[0].0, "a");
        assert_eq!(results[1].0, "b");
    }

    #[tokio::test]
    async fn test_query_orders_by_score() {
        let index = InMemoryVectorIndex::new();
        index.upsert("x", vec![1.0, 0.0], serde_json::Value::Null).await.unwrap();
        index.upsert("y", vec![0.7, 0.7], serde_json::Value::Null).await.unwrap();
        index.upsert("z", vec![0.0, 1.0], serde_json::Value::Null).await.unwrap();

        let results = index.query(&[0.0, 1.0], 2).await.unwrap();
        let ids: Vec<_> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["z", "y"]);
        assert!(results[0].1 >= results[1].1);
    }

    #[tokio::test]
    async fn test_empty_index() {
        let index = InMemoryVectorIndex::new();
        assert!(index.query(&[1.0], 3).await.unwrap().is_empty());
    }
}
