//! Knowledge base search tool

use async_trait::async_trait;
use polymind_knowledge::VectorStore;
use std::sync::Arc;

use super::ToolHandler;
use crate::error::AiError;

/// Results fetched per search
const SEARCH_K: usize = 5;

/// Returned when the store has nothing relevant
pub const NO_RESULTS: &str = "No relevant information found in the knowledge base.";

/// Similarity search over the shared knowledge base
pub struct KnowledgeSearchTool {
    store: Arc<dyn VectorStore>,
}

impl KnowledgeSearchTool {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolHandler for KnowledgeSearchTool {
    fn name(&self) -> &str {
        "knowledge_search"
    }

    fn description(&self) -> &str {
        "Search through the knowledge base for relevant information"
    }

    async fn call(&self, input: &str) -> Result<String, AiError> {
        let hits = self.store.search(input, SEARCH_K).await?;
        if hits.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }

        let results: Vec<serde_json::Value> = hits
            .iter()
            .map(|hit| {
                serde_json::json!({
                    "content": hit.content,
                    "metadata": hit.metadata,
                })
            })
            .collect();
        Ok(serde_json::to_string_pretty(&results).unwrap_or_default())
    }
}
