//! Qdrant-backed vector store
//!
//! Talks to the Qdrant REST API. Documents are embedded on the way in and
//! queries are embedded on the way out, both through the configured
//! [`EmbeddingProvider`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::document::{Document, ScoredDocument};
use crate::embeddings::EmbeddingProvider;
use crate::error::KnowledgeError;
use crate::store::VectorStore;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Qdrant vector store client
pub struct QdrantStore {
    client: Client,
    base_url: String,
    collection: String,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for QdrantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantStore")
            .field("base_url", &self.base_url)
            .field("collection", &self.collection)
            .finish()
    }
}

impl QdrantStore {
    pub fn new(base_url: String, collection: String, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            collection,
            embedder,
        }
    }

    /// Create the collection if it does not exist yet
    pub async fn ensure_collection(&self) -> Result<(), KnowledgeError> {
        let url = format!("{}/collections/{}", self.base_url, self.collection);
        let response = self.client.get(&url).send().await.map_err(|e| {
            KnowledgeError::Store(format!("failed to reach Qdrant at {}: {}", self.base_url, e))
        })?;
        if response.status().is_success() {
            return Ok(());
        }

        debug!("creating Qdrant collection '{}'", self.collection);
        let body = serde_json::json!({
            "vectors": {
                "size": self.embedder.dimension(),
                "distance": "Cosine",
            }
        });
        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| KnowledgeError::Store(format!("failed to create collection: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(KnowledgeError::Store(format!(
                "Qdrant collection create failed with status {}: {}",
                status, error_text
            )));
        }
        Ok(())
    }

    /// Pair each document with its vector as an upsertable point
    fn to_points(documents: &[Document], vectors: Vec<Vec<f32>>) -> Vec<QdrantPoint> {
        documents
            .iter()
            .zip(vectors)
            .map(|(doc, vector)| QdrantPoint {
                id: Uuid::new_v4().to_string(),
                vector,
                payload: serde_json::json!({
                    "content": doc.content,
                    "metadata": doc.metadata,
                }),
            })
            .collect()
    }

    /// Convert a Qdrant search response to scored documents
    fn from_search_response(resp: SearchApiResponse) -> Vec<ScoredDocument> {
        resp.result
            .into_iter()
            .map(|hit| {
                let payload = hit.payload.unwrap_or(Value::Null);
                let content = payload
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let metadata = payload
                    .get("metadata")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                ScoredDocument {
                    content,
                    metadata,
                    similarity_score: hit.score,
                }
            })
            .collect()
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn upsert(&self, documents: &[Document]) -> Result<(), KnowledgeError> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != documents.len() {
            return Err(KnowledgeError::Embedding(format!(
                "expected {} vectors, got {}",
                documents.len(),
                vectors.len()
            )));
        }

        let points = Self::to_points(documents, vectors);
        debug!(
            "upserting {} points into Qdrant collection '{}'",
            points.len(),
            self.collection
        );

        let url = format!(
            "{}/collections/{}/points?wait=true",
            self.base_url, self.collection
        );
        let response = self
            .client
            .put(&url)
            .json(&serde_json::json!({ "points": points }))
            .send()
            .await
            .map_err(|e| KnowledgeError::Store(format!("failed to upsert points: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(KnowledgeError::Store(format!(
                "Qdrant upsert failed with status {}: {}",
                status, error_text
            )));
        }
        Ok(())
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>, KnowledgeError> {
        let vectors = self.embedder.embed(&[query.to_string()]).await?;
        let vector = vectors.into_iter().next().ok_or_else(|| {
            KnowledgeError::Embedding("no vector returned for query".to_string())
        })?;

        debug!(
            "searching Qdrant collection '{}' with k={}",
            self.collection, k
        );

        let url = format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        );
        let body = serde_json::json!({
            "vector": vector,
            "limit": k,
            "with_payload": true,
        });
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| KnowledgeError::Store(format!("failed to search points: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(KnowledgeError::Store(format!(
                "Qdrant search failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: SearchApiResponse = response.json().await.map_err(|e| {
            KnowledgeError::Store(format!("failed to parse Qdrant response: {}", e))
        })?;

        Ok(Self::from_search_response(api_response))
    }
}

// ── Qdrant wire types ──

#[derive(Debug, Clone, Serialize)]
struct QdrantPoint {
    id: String,
    vector: Vec<f32>,
    payload: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchApiResponse {
    result: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchHit {
    score: f32,
    payload: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn test_to_points_pairs_documents_with_vectors() {
        let mut metadata = Map::new();
        metadata.insert("source".to_string(), Value::String("test".to_string()));
        let docs = vec![
            Document::new("first").with_metadata(metadata),
            Document::new("second"),
        ];
        let vectors = vec![vec![0.1, 0.2], vec![0.3, 0.4]];

        let points = QdrantStore::to_points(&docs, vectors);
        assert_eq!(points.len(), 2);
        assert_ne!(points[0].id, points[1].id);
        assert_eq!(points[0].payload["content"], "first");
        assert_eq!(points[0].payload["metadata"]["source"], "test");
        assert_eq!(points[1].vector, vec![0.3, 0.4]);
    }

    #[test]
    fn test_from_search_response_extracts_payload() {
        let resp = SearchApiResponse {
            result: vec![SearchHit {
                score: 0.92,
                payload: Some(serde_json::json!({
                    "content": "rust ownership",
                    "metadata": {"source": "book"},
                })),
            }],
        };
        let docs = QdrantStore::from_search_response(resp);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "rust ownership");
        assert_eq!(docs[0].metadata["source"], "book");
        assert_eq!(docs[0].similarity_score, 0.92);
    }

    #[test]
    fn test_from_search_response_tolerates_missing_payload() {
        let resp = SearchApiResponse {
            result: vec![SearchHit {
                score: 0.5,
                payload: None,
            }],
        };
        let docs = QdrantStore::from_search_response(resp);
        assert_eq!(docs[0].content, "");
        assert!(docs[0].metadata.is_empty());
    }

    #[test]
    fn test_search_response_parses_qdrant_json() {
        let raw = r#"{
            "result": [
                {"id": "a1", "score": 0.88, "payload": {"content": "hello", "metadata": {}}}
            ],
            "status": "ok",
            "time": 0.001
        }"#;
        let resp: SearchApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.result.len(), 1);
        assert_eq!(resp.result[0].score, 0.88);
    }

    struct MockEmbedder;

    #[async_trait]
    impl EmbeddingProvider for MockEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, KnowledgeError> {
            Ok(texts.iter().map(|_| vec![0.0; 4]).collect())
        }

        fn dimension(&self) -> usize {
            4
        }
    }

    #[tokio::test]
    async fn test_upsert_empty_batch_skips_network() {
        // base_url points nowhere; an empty batch must still succeed
        let store = QdrantStore::new(
            "http://127.0.0.1:1".to_string(),
            "test".to_string(),
            Arc::new(MockEmbedder),
        );
        store.upsert(&[]).await.unwrap();
    }
}
