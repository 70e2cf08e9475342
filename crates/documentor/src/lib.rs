//! documentor: question answering over uploaded PDF documents
//!
//! A PDF is uploaded once, split into overlapping chunks, embedded and kept
//! in an in-memory per-document index. Questions against that document are
//! answered by a language model that sees only the top-K most similar chunks.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::{Answerer, NO_CONTEXT_ANSWER};
pub use ingestion::{DocumentIngestor, TextChunker};
pub use retrieval::{DocumentIndex, DocumentStore, IndexBuilder};
pub use server::{build_router, state::AppState, RagServer};
pub use types::{Answer, Chunk, ChunkSource, PageText, RetrievedChunk};
