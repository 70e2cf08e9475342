//! Google Generative Language API providers
//!
//! Embeddings via `embedding-001` and answer generation via `gemini-1.5-flash`,
//! authenticated with the `GOOGLE_API_KEY` credential.

mod chat;
mod client;
mod embedder;

pub use chat::GeminiChat;
pub use client::GeminiHttp;
pub use embedder::GeminiEmbedder;
