//! Retrieval-augmented answering over a stored document

use std::sync::Arc;

use super::prompt::PromptBuilder;
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, LlmProvider, VectorIndex};
use crate::retrieval::DocumentStore;
use crate::types::Answer;

/// Returned without calling the LLM when retrieval finds nothing
pub const NO_CONTEXT_ANSWER: &str =
    "I don't know. The document does not contain enough context to answer this question.";

/// Answers questions about one stored document at a time
pub struct Answerer {
    store: Arc<DocumentStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl Answerer {
    pub fn new(
        store: Arc<DocumentStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            llm,
            top_k,
        }
    }

    /// Answer `question` using the top-K chunks of document `key`
    ///
    /// The store lookup happens once, so a concurrent re-upload of the same
    /// key never mixes chunks from two versions into one prompt.
    pub async fn ask(&self, key: &str, question: &str) -> Result<Answer> {
        let document = self.store.get(key)?;

        if self.top_k == 0 || document.index.is_empty() {
            return Ok(Self::no_context());
        }

        let query = self
            .embedder
            .embed(question)
            .await
            .map_err(|e| Error::retrieval(format!("failed to embed question: {}", e)))?;

        let context = document.index.search(&query, self.top_k).map_err(|e| match e {
            Error::Retrieval(_) => e,
            other => Error::retrieval(other.to_string()),
        })?;

        if context.is_empty() {
            return Ok(Self::no_context());
        }

        tracing::debug!(
            "Retrieved {} chunks from '{}' (best score {:.3})",
            context.len(),
            key,
            context[0].score
        );

        let prompt = PromptBuilder::build_qa_prompt(question, &context);
        let text = self.llm.complete(&prompt).await.map_err(|e| match e {
            Error::Generation(_) => e,
            other => Error::generation(other.to_string()),
        })?;

        if text.trim().is_empty() {
            return Err(Error::generation(format!(
                "{} returned an empty answer",
                self.llm.model()
            )));
        }

        Ok(Answer {
            text: text.trim().to_string(),
            context,
        })
    }

    fn no_context() -> Answer {
        Answer {
            text: NO_CONTEXT_ANSWER.to_string(),
            context: Vec::new(),
        }
    }
}
