//! Page and chunk types with source tracking

use serde::{Deserialize, Serialize};

/// Text extracted from a single PDF page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Extracted text of the page
    pub text: String,
}

impl PageText {
    /// Create a new page
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }
}

/// Where a chunk came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Document key (the uploaded filename)
    pub document_key: String,
    /// Page the chunk was cut from
    pub page_number: Option<u32>,
}

/// A contiguous span of extracted document text
///
/// Chunks are immutable once the ingestor has produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of the chunk within its document (0-indexed)
    pub index: u32,
    /// Text content
    pub content: String,
    /// Source metadata
    pub source: ChunkSource,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(index: u32, content: String, source: ChunkSource) -> Self {
        Self {
            index,
            content,
            source,
        }
    }
}
