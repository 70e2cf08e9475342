//! Capability ports for PDF extraction, embeddings, vector indexing, and the LLM
//!
//! The core components only see these traits, so tests can substitute fakes
//! and deployments can swap the Gemini/flat-index defaults.

pub mod embedding;
pub mod extractor;
pub mod flat_index;
pub mod gemini;
pub mod llm;
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use extractor::{LopdfExtractor, PdfExtractor};
pub use flat_index::{FlatIndex, FlatIndexProvider};
pub use gemini::{GeminiChat, GeminiEmbedder};
pub use llm::LlmProvider;
pub use vector_index::{IndexEntry, VectorIndex, VectorIndexProvider};
