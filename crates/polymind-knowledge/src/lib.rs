//! Knowledge base layer for Polymind
//!
//! This crate provides:
//! - Document and scored-result types shared with the agent layer
//! - The `EmbeddingProvider` trait and an OpenAI-backed implementation
//! - The `VectorStore` trait and a Qdrant-backed implementation

pub mod document;
pub mod embeddings;
pub mod error;
pub mod qdrant;
pub mod store;

// Re-export main types
pub use document::{Document, ScoredDocument};
pub use embeddings::{EmbeddingProvider, OpenAiEmbeddings, EMBEDDING_DIMENSION};
pub use error::KnowledgeError;
pub use qdrant::QdrantStore;
pub use store::VectorStore;
