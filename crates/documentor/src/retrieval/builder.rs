//! Embeds chunks and builds a queryable per-document index

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::ingestion::IngestedDocument;
use crate::providers::{EmbeddingProvider, IndexEntry, VectorIndex, VectorIndexProvider};
use crate::types::response::DocumentSummary;

/// Searchable index of one document, immutable once built
pub struct DocumentIndex {
    /// Document key (the uploaded filename)
    pub key: String,
    /// Vector index over the document's chunks
    pub index: Arc<dyn VectorIndex>,
    pub chunk_count: usize,
    pub page_count: usize,
    /// SHA-256 of the uploaded bytes, hex encoded
    pub content_hash: String,
    pub ingested_at: DateTime<Utc>,
}

impl DocumentIndex {
    /// Summary for listings
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            file_key: self.key.clone(),
            chunk_count: self.chunk_count,
            page_count: self.page_count,
            content_hash: self.content_hash.clone(),
            ingested_at: self.ingested_at,
        }
    }
}

impl std::fmt::Debug for DocumentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIndex")
            .field("key", &self.key)
            .field("chunk_count", &self.chunk_count)
            .field("dimensions", &self.index.dimensions())
            .field("content_hash", &self.content_hash)
            .finish()
    }
}

/// Builds [`DocumentIndex`] values from ingested documents
pub struct IndexBuilder {
    embedder: Arc<dyn EmbeddingProvider>,
    index_provider: Arc<dyn VectorIndexProvider>,
}

impl IndexBuilder {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index_provider: Arc<dyn VectorIndexProvider>,
    ) -> Self {
        Self {
            embedder,
            index_provider,
        }
    }

    /// Embed every chunk and build the index
    ///
    /// Nothing is published here; the caller hands the result to the store.
    pub async fn build(&self, document: IngestedDocument) -> Result<DocumentIndex> {
        let texts: Vec<String> = document.chunks.iter().map(|c| c.content.clone()).collect();

        tracing::debug!(
            "Embedding {} chunks of '{}' with {}",
            texts.len(),
            document.key,
            self.embedder.name()
        );
        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            self.embedder.embed_batch(&texts).await?
        };
        validate_embeddings(&embeddings, texts.len())?;

        let chunk_count = document.chunks.len();
        let entries = document
            .chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
            .collect();
        let index = self.index_provider.build(entries)?;

        tracing::debug!(
            "Built {} index for '{}' ({} dimensions)",
            self.index_provider.name(),
            document.key,
            index.dimensions()
        );

        Ok(DocumentIndex {
            key: document.key,
            index,
            chunk_count,
            page_count: document.page_count,
            content_hash: document.content_hash,
            ingested_at: Utc::now(),
        })
    }
}

fn validate_embeddings(embeddings: &[Vec<f32>], expected: usize) -> Result<()> {
    if embeddings.len() != expected {
        return Err(Error::embedding(format!(
            "expected {} embeddings, got {}",
            expected,
            embeddings.len()
        )));
    }

    let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
    for (i, embedding) in embeddings.iter().enumerate() {
        if embedding.is_empty() {
            return Err(Error::embedding(format!("embedding {} is empty", i)));
        }
        if embedding.len() != dimensions {
            return Err(Error::embedding(format!(
                "embedding {} has {} dimensions, expected {}",
                i,
                embedding.len(),
                dimensions
            )));
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(Error::embedding(format!(
                "embedding {} contains non-finite values",
                i
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::FlatIndexProvider;
    use crate::types::{Chunk, ChunkSource};
    use async_trait::async_trait;

    /// Returns canned vectors regardless of input
    struct CannedEmbedder(Vec<Vec<f32>>);

    #[async_trait]
    impl EmbeddingProvider for CannedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.0[0].clone())
        }

        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn document(chunks: usize) -> IngestedDocument {
        IngestedDocument {
            key: "doc.pdf".to_string(),
            chunks: (0..chunks)
                .map(|i| {
                    Chunk::new(
                        i as u32,
                        format!("chunk {}", i),
                        ChunkSource {
                            document_key: "doc.pdf".to_string(),
                            page_number: Some(1),
                        },
                    )
                })
                .collect(),
            page_count: 1,
            content_hash: "ab".repeat(32),
        }
    }

    fn builder(vectors: Vec<Vec<f32>>) -> IndexBuilder {
        IndexBuilder::new(
            Arc::new(CannedEmbedder(vectors)),
            Arc::new(FlatIndexProvider::default()),
        )
    }

    #[tokio::test]
    async fn test_build_indexes_every_chunk() {
        let index = builder(vec![vec![1.0, 0.0], vec![0.0, 1.0]])
            .build(document(2))
            .await
            .unwrap();

        assert_eq!(index.key, "doc.pdf");
        assert_eq!(index.chunk_count, 2);
        assert_eq!(index.index.len(), 2);
        assert_eq!(index.index.dimensions(), 2);

        let summary = index.summary();
        assert_eq!(summary.file_key, "doc.pdf");
        assert_eq!(summary.chunk_count, 2);
    }

    #[tokio::test]
    async fn test_count_mismatch_is_embedding_error() {
        let result = builder(vec![vec![1.0, 0.0]]).build(document(2)).await;
        assert!(matches!(result, Err(Error::Embedding(_))));
    }

    #[tokio::test]
    async fn test_inconsistent_dimensions_rejected() {
        let result = builder(vec![vec![1.0, 0.0], vec![1.0]]).build(document(2)).await;
        assert!(matches!(result, Err(Error::Embedding(_))));
    }

    #[tokio::test]
    async fn test_non_finite_vector_rejected() {
        let result = builder(vec![vec![f32::NAN, 0.0]]).build(document(1)).await;
        assert!(matches!(result, Err(Error::Embedding(_))));

        let result = builder(vec![vec![]]).build(document(1)).await;
        assert!(matches!(result, Err(Error::Embedding(_))));
    }
}
