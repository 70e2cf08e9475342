//! Core types for documents, chunks, and API payloads

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, ChunkSource, PageText};
pub use query::QueryForm;
pub use response::{Answer, RetrievedChunk};
