//! Uniform response envelopes
//!
//! Every public operation returns an [`Envelope`] wrapping its payload:
//! the payload fields flattened at the top level, plus `status`,
//! `timestamp`, and (only on failure) `error`. Construction goes through
//! [`Envelope::success`] and [`Envelope::error`], so `error` is present
//! exactly when `status` is `"error"`.

use chrono::{DateTime, Utc};
use polymind_knowledge::ScoredDocument;
use serde::{Deserialize, Serialize};

/// Outcome marker carried by every envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Response envelope around an operation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(flatten)]
    pub payload: T,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(payload: T) -> Self {
        Self {
            payload,
            status: Status::Success,
            timestamp: Utc::now(),
            error: None,
        }
    }

    pub fn error(payload: T, cause: impl std::fmt::Display) -> Self {
        Self {
            payload,
            status: Status::Error,
            timestamp: Utc::now(),
            error: Some(cause.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

/// Payload of a chat turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Payload of a knowledge-base ingest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReceipt {
    pub added_documents: usize,
}

/// Payload of a semantic search; the query is echoed back
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<ScoredDocument>,
}

/// Payload of an embedding request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingBatch {
    pub embeddings: Vec<Vec<f32>>,
    pub count: usize,
}

/// Payload of a sentiment analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentReport {
    pub text: String,
    pub sentiment_analysis: String,
}
