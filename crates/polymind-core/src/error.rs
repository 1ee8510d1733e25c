//! Error taxonomy for the agent layer

use polymind_knowledge::KnowledgeError;
use thiserror::Error;

/// Failures surfaced by agents, providers, and the service layer
///
/// Callers of the public operations never see these directly; the service
/// flattens them into the `error` field of an error envelope. The variants
/// exist so internal code can branch on failure class.
#[derive(Debug, Error)]
pub enum AiError {
    /// The LLM provider was unreachable, rejected the request, or
    /// returned an unusable completion
    #[error("provider error: {0}")]
    Provider(String),

    /// The knowledge store failed
    #[error("store error: {0}")]
    Store(String),

    /// Bad input caught before any collaborator was called
    #[error("validation error: {0}")]
    Validation(String),
}

impl From<KnowledgeError> for AiError {
    fn from(err: KnowledgeError) -> Self {
        match err {
            KnowledgeError::Embedding(msg) => AiError::Provider(msg),
            KnowledgeError::Store(msg) => AiError::Store(msg),
        }
    }
}
