//! Grounded answer generation

mod answerer;
mod prompt;

pub use answerer::{Answerer, NO_CONTEXT_ANSWER};
pub use prompt::PromptBuilder;
