//! Request extractors that report rejections through [`Error`]

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};

use crate::error::{Error, Result};
use crate::types::QueryForm;

/// Accepts `file_key` and `question` as urlencoded or multipart form data
#[async_trait]
impl<S> FromRequest<S> for QueryForm
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let Form(form) = Form::<QueryForm>::from_request(req, state)
                .await
                .map_err(|e| Error::InvalidRequest(e.body_text()))?;
            return Ok(form);
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| Error::InvalidRequest(e.body_text()))?;

        let mut file_key = None;
        let mut question = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| Error::InvalidRequest(format!("Failed to read multipart body: {}", e)))?
        {
            let slot = match field.name() {
                Some("file_key") => &mut file_key,
                Some("question") => &mut question,
                _ => continue,
            };
            let value = field
                .text()
                .await
                .map_err(|e| Error::InvalidRequest(format!("Failed to read form field: {}", e)))?;
            *slot = Some(value);
        }

        match (file_key, question) {
            (Some(file_key), Some(question)) => Ok(QueryForm { file_key, question }),
            (None, _) => Err(Error::InvalidRequest("missing field `file_key`".to_string())),
            (_, None) => Err(Error::InvalidRequest("missing field `question`".to_string())),
        }
    }
}
