//! Embedding providers (OpenAI embeddings API)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::KnowledgeError;

/// Width of the vectors produced by the default embedding model
pub const EMBEDDING_DIMENSION: usize = 1536;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Turns text into fixed-width vectors
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, KnowledgeError>;

    /// Width of the vectors this provider produces
    fn dimension(&self) -> usize;
}

/// OpenAI embeddings provider
pub struct OpenAiEmbeddings {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for OpenAiEmbeddings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiEmbeddings {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url,
            model,
        }
    }

    /// Pull vectors out of an API response, restoring input order by index
    fn from_embeddings_response(
        resp: EmbeddingsApiResponse,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, KnowledgeError> {
        let mut data = resp.data;
        if data.len() != expected {
            return Err(KnowledgeError::Embedding(format!(
                "expected {} embeddings, got {}",
                expected,
                data.len()
            )));
        }
        data.sort_by_key(|item| item.index);
        Ok(data.into_iter().map(|item| item.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, KnowledgeError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        debug!(
            "OpenAI embeddings request: model={}, inputs={}",
            self.model,
            texts.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                KnowledgeError::Embedding(format!("failed to send request to OpenAI API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(KnowledgeError::Embedding(format!(
                "OpenAI API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: EmbeddingsApiResponse = response.json().await.map_err(|e| {
            KnowledgeError::Embedding(format!("failed to parse OpenAI API response: {}", e))
        })?;

        Self::from_embeddings_response(api_response, texts.len())
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}

// ── OpenAI wire types ──

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmbeddingsApiResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}
