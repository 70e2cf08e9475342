//! Gemini embedding provider (`embedding-001`)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::GeminiHttp;
use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::providers::embedding::EmbeddingProvider;

/// Gemini embedding provider
pub struct GeminiEmbedder {
    http: GeminiHttp,
    model: String,
    batch_size: usize,
}

impl GeminiEmbedder {
    /// Create a new embedder from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Ok(Self::from_http(
            GeminiHttp::new(config)?,
            config.embedding_model.clone(),
            config.embedding_batch_size,
        ))
    }

    /// Create from an existing HTTP client
    pub fn from_http(http: GeminiHttp, model: String, batch_size: usize) -> Self {
        Self {
            http,
            model,
            batch_size: batch_size.max(1),
        }
    }

    fn request<'a>(&'a self, text: &'a str, task_type: &'static str) -> EmbedRequest<'a> {
        EmbedRequest {
            model: format!("models/{}", self.model),
            content: Content {
                parts: vec![Part { text }],
            },
            task_type,
        }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: String,
    content: Content<'a>,
    #[serde(rename = "taskType")]
    task_type: &'static str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    /// Embeds a search query
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.http.model_url(&self.model, "embedContent");
        let response: EmbedResponse = self
            .http
            .post_json(&url, &self.request(text, "RETRIEVAL_QUERY"))
            .await
            .map_err(Error::Embedding)?;

        Ok(response.embedding.values)
    }

    /// Embeds document chunks, `batch_size` texts per request
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.http.model_url(&self.model, "batchEmbedContents");
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let request = BatchEmbedRequest {
                requests: batch
                    .iter()
                    .map(|t| self.request(t, "RETRIEVAL_DOCUMENT"))
                    .collect(),
            };

            let response: BatchEmbedResponse = self
                .http
                .post_json(&url, &request)
                .await
                .map_err(Error::Embedding)?;

            if response.embeddings.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "requested {} embeddings, received {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }

            tracing::debug!("Embedded batch of {} texts", batch.len());
            all_embeddings.extend(response.embeddings.into_iter().map(|e| e.values));
        }

        Ok(all_embeddings)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::gemini::client::stalled_server;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn config(base_url: String) -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-key".to_string()),
            base_url,
            max_retries: 0,
            embedding_batch_size: 2,
            ..GeminiConfig::default()
        }
    }

    #[tokio::test]
    async fn test_stalled_requests_time_out_as_embedding_failure() {
        let mut config = config(stalled_server().await);
        config.timeout_secs = 1;
        let embedder = GeminiEmbedder::new(&config).unwrap();

        let query = tokio::time::timeout(Duration::from_secs(10), embedder.embed("question"))
            .await
            .expect("request should be bounded by the client timeout");
        assert!(matches!(query, Err(Error::Embedding(_))));

        let texts = vec!["chunk".to_string()];
        let batch = tokio::time::timeout(Duration::from_secs(10), embedder.embed_batch(&texts))
            .await
            .expect("request should be bounded by the client timeout");
        match batch {
            Err(Error::Embedding(message)) => assert!(message.contains("timed out"), "{}", message),
            other => panic!("expected embedding error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_batch_embedding_splits_requests() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/embedding-001:batchEmbedContents")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Regex("RETRIEVAL_DOCUMENT".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "embeddings": [{ "values": [0.1, 0.2] }, { "values": [0.3, 0.4] }] })
                    .to_string(),
            )
            .expect(2)
            .create_async()
            .await;

        let embedder = GeminiEmbedder::new(&config(server.url())).unwrap();
        let texts: Vec<String> = (0..4).map(|i| format!("text {}", i)).collect();
        let embeddings = embedder.embed_batch(&texts).await.unwrap();

        assert_eq!(embeddings.len(), 4);
        assert_eq!(embeddings[2], vec![0.1, 0.2]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_short_batch_response_is_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/embedding-001:batchEmbedContents")
            .with_status(200)
            .with_body(json!({ "embeddings": [{ "values": [0.1] }] }).to_string())
            .create_async()
            .await;

        let embedder = GeminiEmbedder::new(&config(server.url())).unwrap();
        let texts = vec!["a".to_string(), "b".to_string()];
        let result = embedder.embed_batch(&texts).await;
        assert!(matches!(result, Err(Error::Embedding(_))));
    }

    #[tokio::test]
    async fn test_rate_limit_is_embedding_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/embedding-001:embedContent")
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let embedder = GeminiEmbedder::new(&config(server.url())).unwrap();
        match embedder.embed("question").await {
            Err(Error::Embedding(message)) => assert!(message.contains("429")),
            other => panic!("expected embedding error, got {:?}", other.map(|v| v.len())),
        }
    }

    #[tokio::test]
    async fn test_query_embedding_uses_query_task() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/embedding-001:embedContent")
            .match_body(Matcher::PartialJson(json!({
                "model": "models/embedding-001",
                "taskType": "RETRIEVAL_QUERY"
            })))
            .with_status(200)
            .with_body(json!({ "embedding": { "values": [1.0, 0.0, 0.5] } }).to_string())
            .create_async()
            .await;

        let embedder = GeminiEmbedder::new(&config(server.url())).unwrap();
        assert_eq!(embedder.embed("what?").await.unwrap(), vec![1.0, 0.0, 0.5]);
        mock.assert_async().await;
    }
}
