//! Error types for the document Q&A service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
///
/// Each variant maps to one failure kind that stays visible all the way to
/// the HTTP boundary, see [`Error::kind`].
#[derive(Debug, Error)]
pub enum Error {
    /// The uploaded document is not a PDF
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// No document is stored under the requested key
    #[error("Document not found: {0}")]
    NotFound(String),

    /// PDF parsing failed or produced no usable text
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// The embedding service failed or returned malformed vectors
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Querying the document index failed
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// The language model call failed
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// Malformed request (missing form field, unreadable multipart body)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an unsupported format error
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat(message.into())
    }

    /// Create an extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Stable tag identifying the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UnsupportedFormat(_) => "unsupported_format",
            Error::NotFound(_) => "not_found",
            Error::Extraction(_) => "extraction_failure",
            Error::Embedding(_) => "embedding_failure",
            Error::Retrieval(_) => "retrieval_failure",
            Error::Generation(_) => "generation_failure",
            Error::InvalidRequest(_) => "invalid_request",
            Error::Config(_) => "config_error",
            Error::Io(_) => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller caused this error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match &self {
            Error::UnsupportedFormat(_) => "Only PDF files are allowed.".to_string(),
            Error::NotFound(_) => "Document not found. Please upload it first.".to_string(),
            other => other.to_string(),
        };

        if self.is_client_error() {
            tracing::debug!(kind = self.kind(), "Request rejected: {}", self);
        } else {
            tracing::error!(kind = self.kind(), "Request failed: {}", self);
        }

        let body = Json(json!({
            "detail": detail,
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_split() {
        assert_eq!(
            Error::unsupported_format("notes.txt").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotFound("a.pdf".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert!(Error::InvalidRequest("no file".into()).is_client_error());
        for err in [
            Error::extraction("empty"),
            Error::embedding("rate limited"),
            Error::retrieval("bad query"),
            Error::generation("timeout"),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert!(!err.is_client_error());
        }
    }

    #[test]
    fn test_kinds_are_distinct() {
        let kinds = [
            Error::unsupported_format("x").kind(),
            Error::NotFound("x".into()).kind(),
            Error::extraction("x").kind(),
            Error::embedding("x").kind(),
            Error::retrieval("x").kind(),
            Error::generation("x").kind(),
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }

    #[tokio::test]
    async fn test_response_body_carries_kind() {
        let response = Error::generation("model overloaded").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["kind"], "generation_failure");
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("model overloaded"));
    }
}
