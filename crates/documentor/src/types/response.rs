//! Answer and API response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::Chunk;

/// A chunk returned by top-K retrieval, with its similarity score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// The matched chunk
    pub chunk: Chunk,
    /// Similarity score (higher is more similar)
    pub score: f32,
}

/// Generated answer together with the context it was generated from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// LLM output (or the fixed fallback when no context was found)
    pub text: String,
    /// Chunks handed to the LLM, most similar first
    pub context: Vec<RetrievedChunk>,
}

impl Answer {
    /// Whether the answer was produced without any retrieved context
    pub fn is_fallback(&self) -> bool {
        self.context.is_empty()
    }
}

/// Response of `POST /upload/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub message: String,
    pub file_key: String,
}

impl UploadResponse {
    /// Successful upload of `file_key`
    pub fn success(file_key: String) -> Self {
        Self {
            status: "success".to_string(),
            message: format!("'{}' processed and ready for questions.", file_key),
            file_key,
        }
    }
}

/// Response of `POST /query/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub status: String,
    pub answer: String,
}

impl QueryResponse {
    /// Successful answer
    pub fn success(answer: String) -> Self {
        Self {
            status: "success".to_string(),
            answer,
        }
    }
}

/// Response of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Summary of a stored document for `GET /documents/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub file_key: String,
    pub chunk_count: usize,
    pub page_count: usize,
    pub content_hash: String,
    pub ingested_at: DateTime<Utc>,
}

/// Response of `GET /documents/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
    pub total: usize,
    /// Store capacity, `None` when unbounded
    pub capacity: Option<usize>,
}
