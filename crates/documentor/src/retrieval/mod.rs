//! Per-document indexes and the store that publishes them

mod builder;
mod store;

pub use builder::{DocumentIndex, IndexBuilder};
pub use store::DocumentStore;
