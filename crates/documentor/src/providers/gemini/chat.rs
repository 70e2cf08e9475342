//! Gemini chat client for answer generation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::GeminiHttp;
use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::providers::llm::LlmProvider;

/// Gemini `generateContent` client
pub struct GeminiChat {
    http: GeminiHttp,
    model: String,
    temperature: f32,
}

impl GeminiChat {
    /// Create a new chat client from configuration
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Ok(Self::from_http(
            GeminiHttp::new(config)?,
            config.chat_model.clone(),
            config.temperature,
        ))
    }

    /// Create from an existing HTTP client
    pub fn from_http(http: GeminiHttp, model: String, temperature: f32) -> Self {
        Self {
            http,
            model,
            temperature,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl LlmProvider for GeminiChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let url = self.http.model_url(&self.model, "generateContent");
        let response: GenerateResponse = self
            .http
            .post_json(&url, &request)
            .await
            .map_err(Error::Generation)?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::generation("No candidates in Gemini response"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::generation(format!(
                "No text in Gemini response (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
