//! Document ingestion pipeline: PDF bytes to page-tagged chunks

mod chunker;
mod ingestor;

pub use chunker::{TextChunker, DEFAULT_SEPARATORS};
pub use ingestor::{DocumentIngestor, IngestedDocument};
