//! Application state shared by all request handlers

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::Answerer;
use crate::ingestion::DocumentIngestor;
use crate::providers::{
    EmbeddingProvider, FlatIndexProvider, GeminiChat, GeminiEmbedder, LlmProvider,
    LopdfExtractor, PdfExtractor, VectorIndexProvider,
};
use crate::retrieval::{DocumentStore, IndexBuilder};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// PDF bytes to chunks
    ingestor: DocumentIngestor,
    /// Chunks to a searchable index
    index_builder: IndexBuilder,
    /// Published indexes, keyed by filename
    store: Arc<DocumentStore>,
    /// Question answering over the store
    answerer: Answerer,
}

impl AppState {
    /// Create state wired to the Gemini API, lopdf and the flat index
    pub fn new(config: RagConfig) -> Result<Self> {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(GeminiEmbedder::new(&config.gemini)?);
        let llm: Arc<dyn LlmProvider> = Arc::new(GeminiChat::new(&config.gemini)?);
        let extractor: Arc<dyn PdfExtractor> = Arc::new(LopdfExtractor::new());
        let index_provider: Arc<dyn VectorIndexProvider> =
            Arc::new(FlatIndexProvider::new(config.retrieval.metric));

        tracing::info!(
            "Using extractor: {}, embeddings: {} ({}), LLM: {} ({}), index: {}",
            extractor.name(),
            embedder.name(),
            config.gemini.embedding_model,
            llm.name(),
            llm.model(),
            index_provider.name()
        );

        Ok(Self::from_parts(config, extractor, embedder, llm, index_provider))
    }

    /// Create state from explicit providers
    pub fn from_parts(
        config: RagConfig,
        extractor: Arc<dyn PdfExtractor>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        index_provider: Arc<dyn VectorIndexProvider>,
    ) -> Self {
        let store = Arc::new(DocumentStore::new(config.store.max_documents));
        let ingestor = DocumentIngestor::new(&config, extractor);
        let index_builder = IndexBuilder::new(Arc::clone(&embedder), index_provider);
        let answerer = Answerer::new(Arc::clone(&store), embedder, llm, config.retrieval.top_k);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                ingestor,
                index_builder,
                store,
                answerer,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get document ingestor
    pub fn ingestor(&self) -> &DocumentIngestor {
        &self.inner.ingestor
    }

    /// Get index builder
    pub fn index_builder(&self) -> &IndexBuilder {
        &self.inner.index_builder
    }

    /// Get document store
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    /// Get answerer
    pub fn answerer(&self) -> &Answerer {
        &self.inner.answerer
    }
}
