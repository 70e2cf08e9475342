//! Document upload endpoint

use std::time::Instant;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::ingestion::DocumentIngestor;
use crate::server::state::AppState;
use crate::types::response::UploadResponse;

/// Multipart field carrying the PDF
const FILE_FIELD: &str = "file";

/// POST /upload/ - Ingest a PDF and publish its index under the filename
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();
    let mut multipart = multipart.map_err(|e| Error::InvalidRequest(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("Failed to read multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::InvalidRequest("Uploaded file has no filename".to_string()))?;

        // Reject before any bytes are buffered
        DocumentIngestor::validate_filename(&filename)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidRequest(format!("Failed to read '{}': {}", filename, e)))?;

        tracing::info!("Processing upload: {} ({} bytes)", filename, data.len());

        let document = state.ingestor().ingest(&filename, &data).await?;
        let index = state.index_builder().build(document).await?;
        let chunk_count = index.chunk_count;

        if state.store().put(index).is_some() {
            tracing::info!("'{}' was already loaded, previous version replaced", filename);
        }

        tracing::info!(
            "Ingested '{}': {} chunks in {}ms",
            filename,
            chunk_count,
            start.elapsed().as_millis()
        );

        return Ok(Json(UploadResponse::success(filename)));
    }

    Err(Error::InvalidRequest(format!(
        "Missing multipart field '{}'",
        FILE_FIELD
    )))
}
