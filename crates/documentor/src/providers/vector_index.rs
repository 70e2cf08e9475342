//! Vector index port: build once, query top-K

use std::sync::Arc;

use crate::error::Result;
use crate::types::{Chunk, RetrievedChunk};

/// A chunk paired with its embedding, ready for indexing
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// A built, read-only nearest-neighbour index
pub trait VectorIndex: Send + Sync {
    /// Return at most `top_k` chunks, most similar first
    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>>;

    /// Number of indexed chunks
    fn len(&self) -> usize;

    /// Check if the index is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Embedding dimensions (0 for an empty index)
    fn dimensions(&self) -> usize;
}

/// Builds indexes from embedded chunks
///
/// Implementations:
/// - `FlatIndexProvider`: exact brute-force search in memory
pub trait VectorIndexProvider: Send + Sync {
    /// Build an index over all entries
    fn build(&self, entries: Vec<IndexEntry>) -> Result<Arc<dyn VectorIndex>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
