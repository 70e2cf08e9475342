//! Prompt template for grounded question answering

use crate::types::RetrievedChunk;

/// Prompt builder for document Q&A
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunk texts, most similar first, separated by blank lines
    pub fn build_context(results: &[RetrievedChunk]) -> String {
        results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full prompt: instructions, context, then the question
    pub fn build_qa_prompt(question: &str, results: &[RetrievedChunk]) -> String {
        format!(
            "You are a helpful assistant for question-answering tasks.\n\
             Answer the following question based only on the provided context.\n\
             If you don't know the answer, just say that you don't know. Don't try to make up an answer.\n\
             \n\
             Context:\n\
             {context}\n\
             \n\
             Question: {question}\n\
             \n\
             Answer:",
            context = Self::build_context(results),
            question = question,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkSource};

    fn retrieved(index: u32, content: &str) -> RetrievedChunk {
        RetrievedChunk {
            chunk: Chunk::new(
                index,
                content.to_string(),
                ChunkSource {
                    document_key: "doc.pdf".to_string(),
                    page_number: Some(1),
                },
            ),
            score: 1.0,
        }
    }

    #[test]
    fn test_context_keeps_retrieval_order() {
        let context = PromptBuilder::build_context(&[retrieved(4, "second"), retrieved(1, "first")]);
        assert_eq!(context, "second\n\nfirst");
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = PromptBuilder::build_qa_prompt(
            "How long is the warranty?",
            &[retrieved(0, "The warranty lasts two years.")],
        );

        assert!(prompt.starts_with("You are a helpful assistant for question-answering tasks.\n"));
        assert!(prompt.contains("based only on the provided context"));
        assert!(prompt.contains("Context:\nThe warranty lasts two years.\n\nQuestion: How long is the warranty?"));
        assert!(prompt.ends_with("Answer:"));

        let context_at = prompt.find("Context:").unwrap();
        let question_at = prompt.find("Question:").unwrap();
        assert!(context_at < question_at);
    }
}
