//! Vector store abstraction

use async_trait::async_trait;

use crate::document::{Document, ScoredDocument};
use crate::error::KnowledgeError;

/// A similarity-searchable document store
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert a batch of documents
    async fn upsert(&self, documents: &[Document]) -> Result<(), KnowledgeError>;

    /// Return up to `k` documents closest to `query`, best first
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>, KnowledgeError>;
}
