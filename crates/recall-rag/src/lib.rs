//! Retrieval side of the assistant
//!
//! Source text is split into overlapping character windows ([`split`]), embedded
//! and upserted into a [`VectorIndex`]. The [`Retriever`] embeds a query and
//! returns the best-scoring chunks, most similar first.

mod chunker;
mod error;
mod index;
mod loader;
mod retriever;

pub use chunker::{split, Chunk, TextChunker};
pub use error::{RagError, Result};
pub use index::{cosine_similarity, InMemoryVectorIndex, VectorIndex};
pub use loader::{Document, JsonRecordLoader, TextLoader, DEFAULT_CITY_POINTERS};
pub use retriever::{RetrievalResult, Retriever};
