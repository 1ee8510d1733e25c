//! Error types for the knowledge base layer

use thiserror::Error;

/// Failures raised by embedding providers and vector stores
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The embedding service rejected the request or returned garbage
    #[error("embedding error: {0}")]
    Embedding(String),

    /// The vector store was unreachable or rejected the operation
    #[error("store error: {0}")]
    Store(String),
}
