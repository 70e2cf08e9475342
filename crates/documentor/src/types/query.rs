//! Request payloads

use serde::Deserialize;

/// Form body of `POST /query/`
#[derive(Debug, Clone, Deserialize)]
pub struct QueryForm {
    /// Key returned by a previous upload
    pub file_key: String,
    /// Natural-language question
    pub question: String,
}
