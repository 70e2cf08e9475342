//! Document ingestion: validation, scoped temp file, extraction, chunking

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tokio::time::timeout;

use super::chunker::TextChunker;
use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::PdfExtractor;
use crate::types::{Chunk, PageText};

/// Magic bytes every PDF starts with
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Chunks extracted from one document
#[derive(Debug, Clone)]
pub struct IngestedDocument {
    /// Document key
    pub key: String,
    /// Ordered chunks
    pub chunks: Vec<Chunk>,
    /// Number of pages reported by the extractor
    pub page_count: usize,
    /// SHA-256 of the uploaded bytes, hex encoded
    pub content_hash: String,
}

/// Turns raw PDF bytes into ordered chunks
pub struct DocumentIngestor {
    extractor: Arc<dyn PdfExtractor>,
    chunker: TextChunker,
    extraction_timeout: Duration,
    temp_dir: Option<PathBuf>,
}

impl DocumentIngestor {
    /// Create an ingestor with an explicit extractor
    pub fn new(config: &RagConfig, extractor: Arc<dyn PdfExtractor>) -> Self {
        Self {
            extractor,
            chunker: TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap),
            extraction_timeout: Duration::from_secs(config.ingestion.extraction_timeout_secs),
            temp_dir: config.ingestion.temp_dir.clone(),
        }
    }

    /// Reject filenames without a `.pdf` extension
    ///
    /// Runs before any upload bytes are read or written anywhere.
    pub fn validate_filename(filename: &str) -> Result<()> {
        let is_pdf = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        if is_pdf {
            Ok(())
        } else {
            Err(Error::unsupported_format(format!(
                "'{}' is not a PDF file",
                filename
            )))
        }
    }

    /// Reject byte streams that do not carry the PDF header
    pub fn validate_content(data: &[u8]) -> Result<()> {
        let start = data
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(data.len());

        if data[start..].starts_with(PDF_MAGIC) {
            Ok(())
        } else {
            Err(Error::unsupported_format("content is not a PDF document"))
        }
    }

    /// Validate, extract and chunk a document
    ///
    /// Fails with `Extraction` when the PDF has no extractable text.
    pub async fn ingest(&self, key: &str, data: &[u8]) -> Result<IngestedDocument> {
        Self::validate_filename(key)?;
        Self::validate_content(data)?;

        let pages = self.extract(data).await?;
        let page_count = pages.len();

        if pages.iter().all(|p| p.text.trim().is_empty()) {
            return Err(Error::extraction(format!(
                "'{}' has no extractable text ({} page(s), possibly scanned images)",
                key, page_count
            )));
        }

        let chunks = self.chunker.chunk_pages(key, &pages);
        tracing::info!(
            "Split '{}' into {} chunks across {} pages",
            key,
            chunks.len(),
            page_count
        );

        Ok(IngestedDocument {
            key: key.to_string(),
            chunks,
            page_count,
            content_hash: hex::encode(Sha256::digest(data)),
        })
    }

    /// Hand the bytes to the extractor through a temp file
    ///
    /// The file lives only inside the blocking task and is removed when its
    /// guard drops, whether extraction succeeds, fails or panics.
    async fn extract(&self, data: &[u8]) -> Result<Vec<PageText>> {
        let extractor = Arc::clone(&self.extractor);
        let temp_dir = self.temp_dir.clone();
        let data = data.to_vec();

        let task = tokio::task::spawn_blocking(move || -> Result<Vec<PageText>> {
            let mut temp_file = create_temp_file(temp_dir.as_deref())?;
            temp_file.write_all(&data)?;
            temp_file.flush()?;
            extractor.extract(temp_file.path())
        });

        match timeout(self.extraction_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(Error::extraction(format!("extraction task failed: {}", e))),
            Err(_) => Err(Error::extraction(format!(
                "extraction timed out after {}s",
                self.extraction_timeout.as_secs()
            ))),
        }
    }
}

fn create_temp_file(dir: Option<&std::path::Path>) -> Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("documentor-").suffix(".pdf");
    let file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    Ok(file)
}
