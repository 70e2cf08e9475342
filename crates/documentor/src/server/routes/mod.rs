//! HTTP routes for the document Q&A service

pub mod documents;
pub mod query;
pub mod upload;

use axum::Json;

use crate::types::response::WelcomeResponse;

/// GET / - Welcome message
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to DocuMentor Backend!".to_string(),
    })
}

/// GET /health - Liveness check
pub async fn health_check() -> &'static str {
    "OK"
}
