//! Document listing endpoint

use axum::{extract::State, Json};

use crate::server::state::AppState;
use crate::types::response::DocumentListResponse;

/// GET /documents/ - List stored documents, most recently used first
pub async fn list_documents(State(state): State<AppState>) -> Json<DocumentListResponse> {
    let documents: Vec<_> = state
        .store()
        .entries()
        .iter()
        .map(|index| index.summary())
        .collect();

    Json(DocumentListResponse {
        total: documents.len(),
        documents,
        capacity: state.store().capacity(),
    })
}
