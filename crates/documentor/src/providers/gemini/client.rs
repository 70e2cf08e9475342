//! Shared HTTP client with timeout and retry for the Gemini API

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};

/// HTTP client for the Generative Language API
#[derive(Debug, Clone)]
pub struct GeminiHttp {
    client: Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
}

/// Base delay before the first retry
const BASE_BACKOFF_MS: u64 = 500;

/// Upper bound on any single retry delay
const MAX_BACKOFF_MS: u64 = 30_000;

/// Outcome of a single request attempt
enum Attempt<T> {
    Done(T),
    Retryable(String),
    Fatal(String),
}

impl GeminiHttp {
    /// Create a client; every request is bounded by `timeout_secs`
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key.to_string(),
            _ => return Err(Error::Config("Gemini API key is not configured".to_string())),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            max_retries: config.max_retries,
        })
    }

    /// URL of a model method, e.g. `models/embedding-001:embedContent`
    pub fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, model, method)
    }

    /// POST a JSON body and decode the JSON response, retrying transient failures
    ///
    /// Returns the failure message on error so callers can attach their own
    /// error kind.
    pub async fn post_json<Req, Resp>(&self, url: &str, body: &Req) -> std::result::Result<Resp, String>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let mut last_error = String::from("request was not attempted");

        for attempt in 0..=self.max_retries {
            match self.try_post(url, body).await {
                Attempt::Done(value) => return Ok(value),
                Attempt::Fatal(message) => return Err(message),
                Attempt::Retryable(message) => {
                    last_error = message;
                    if attempt < self.max_retries {
                        let delay = backoff_delay(attempt);
                        tracing::warn!(
                            "Gemini request failed (attempt {}/{}): {}, retrying in {:?}",
                            attempt + 1,
                            self.max_retries + 1,
                            last_error,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error)
    }

    async fn try_post<Req, Resp>(&self, url: &str, body: &Req) -> Attempt<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = match self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Attempt::Retryable(format!("request timed out: {}", e)),
            Err(e) => return Attempt::Retryable(format!("request failed: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("HTTP {}: {}", status, body);
            return if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                Attempt::Retryable(message)
            } else {
                Attempt::Fatal(message)
            };
        }

        match response.json::<Resp>().await {
            Ok(value) => Attempt::Done(value),
            Err(e) if e.is_timeout() => Attempt::Retryable(format!("response timed out: {}", e)),
            Err(e) => Attempt::Fatal(format!("malformed response: {}", e)),
        }
    }
}

/// Exponential backoff, capped at [`MAX_BACKOFF_MS`]
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(BASE_BACKOFF_MS.saturating_mul(factor).min(MAX_BACKOFF_MS))
}

/// Local endpoint that accepts connections and never answers
#[cfg(test)]
pub(crate) async fn stalled_server() -> String {
    use tokio::io::AsyncReadExt;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                while let Ok(n) = socket.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });

    format!("http://{}", addr)
}
