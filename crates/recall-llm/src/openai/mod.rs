mod client;
mod embeddings;

pub use client::{OpenAIClient, DEFAULT_EMBEDDING_MODEL};
