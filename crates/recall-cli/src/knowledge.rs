use anyhow::{Context, Result};
use recall_rag::{JsonRecordLoader, Retriever, TextLoader};
use recall_types::ChunkingConfig;

use crate::config::KnowledgeConfig;

/// Load and index every configured knowledge file; returns the chunk count
pub async fn ingest_all(
    retriever: &Retriever,
    knowledge: &KnowledgeConfig,
    chunking: &ChunkingConfig,
) -> Result<usize> {
    let json_loader = match &knowledge.json_pointers {
        Some(pointers) => JsonRecordLoader::new(pointers.iter().cloned()),
        None => JsonRecordLoader::default(),
    };

    let mut documents = Vec::new();
    for path in &knowledge.json_files {
        let loaded = json_loader
            .load(path)
            .await
            .with_context(|| format!("Failed to load knowledge file {}", path))?;
        tracing::info!(path = %path, records = loaded.len(), "Loaded JSON records");
        documents.extend(loaded);
    }
    for path in &knowledge.text_files {
        let document = TextLoader::load(path)
            .await
            .with_context(|| format!("Failed to load knowledge file {}", path))?;
        tracing::info!(path = %path, chars = document.text.chars().count(), "Loaded text document");
        documents.push(document);
    }

    let mut chunks = 0;
    for document in &documents {
        chunks += retriever
            .ingest(&document.source_id, &document.text, chunking)
            .await
            .with_context(|| format!("Failed to index {}", document.source_id))?;
    }

    tracing::info!(documents = documents.len(), chunks, "Knowledge base ready");
    Ok(chunks)
}
