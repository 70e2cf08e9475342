//! Exact in-memory vector index using brute-force similarity search
//!
//! Documents are small (hundreds of chunks), so scanning every vector is
//! cheaper than maintaining an approximate graph and gives exact top-K.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::DistanceMetric;
use crate::error::{Error, Result};
use crate::types::{Chunk, RetrievedChunk};

use super::vector_index::{IndexEntry, VectorIndex, VectorIndexProvider};

/// Read-only flat index over (chunk, embedding) pairs
#[derive(Debug)]
pub struct FlatIndex {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
    dimensions: usize,
    metric: DistanceMetric,
}

impl FlatIndex {
    /// Build an index, rejecting entries whose dimensions disagree
    pub fn build(entries: Vec<IndexEntry>, metric: DistanceMetric) -> Result<Self> {
        let dimensions = entries.first().map(|e| e.embedding.len()).unwrap_or(0);

        let mut chunks = Vec::with_capacity(entries.len());
        let mut embeddings = Vec::with_capacity(entries.len());

        for entry in entries {
            if entry.embedding.len() != dimensions {
                return Err(Error::embedding(format!(
                    "chunk {} has {} dimensions, expected {}",
                    entry.chunk.index,
                    entry.embedding.len(),
                    dimensions
                )));
            }
            chunks.push(entry.chunk);
            embeddings.push(entry.embedding);
        }

        Ok(Self {
            chunks,
            embeddings,
            dimensions,
            metric,
        })
    }

    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.metric {
            DistanceMetric::Cosine => cosine_similarity(a, b),
            // Negated so that higher always means closer
            DistanceMetric::L2 => -l2_distance(a, b),
        }
    }
}

impl VectorIndex for FlatIndex {
    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
        if top_k == 0 || self.chunks.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(Error::retrieval(format!(
                "query has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }
        if query.iter().any(|v| !v.is_finite()) {
            return Err(Error::retrieval("query embedding contains non-finite values"));
        }

        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(i, embedding)| (i, self.score(embedding, query)))
            .collect();

        // Ties keep chunk order so results are deterministic
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| RetrievedChunk {
                chunk: self.chunks[i].clone(),
                score,
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Builds [`FlatIndex`] instances with a fixed metric
#[derive(Debug, Clone, Default)]
pub struct FlatIndexProvider {
    metric: DistanceMetric,
}

impl FlatIndexProvider {
    /// Create a provider for the given metric
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }
}

impl VectorIndexProvider for FlatIndexProvider {
    fn build(&self, entries: Vec<IndexEntry>) -> Result<Arc<dyn VectorIndex>> {
        Ok(Arc::new(FlatIndex::build(entries, self.metric)?))
    }

    fn name(&self) -> &str {
        "flat"
    }
}

/// Cosine similarity; 0.0 if either vector has zero magnitude
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
