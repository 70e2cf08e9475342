//! Question answering endpoint

use std::time::Instant;

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{response::QueryResponse, QueryForm};

/// POST /query/ - Answer a question about an uploaded document
pub async fn query_document(
    State(state): State<AppState>,
    form: QueryForm,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();
    tracing::info!("Query on '{}': \"{}\"", form.file_key, form.question);

    let answer = state.answerer().ask(&form.file_key, &form.question).await?;

    tracing::info!(
        "Answered from {} chunks in {}ms{}",
        answer.context.len(),
        start.elapsed().as_millis(),
        if answer.is_fallback() { " (no context)" } else { "" }
    );

    Ok(Json(QueryResponse::success(answer.text)))
}
