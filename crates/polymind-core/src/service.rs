//! Service facade - the public operations of the AI layer
//!
//! [`AiService`] wires the agent fleet, the LLM provider, the embedder,
//! and the vector store together and exposes the operations callers see.
//! Every operation returns an envelope; failures are logged and folded
//! into the envelope rather than raised.

use polymind_knowledge::{Document, EmbeddingProvider, VectorStore};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::catalog::AgentConfig;
use crate::envelope::{
    ChatReply, EmbeddingBatch, Envelope, IngestReceipt, SearchResults, SentimentReport,
};
use crate::error::AiError;
use crate::manager::AgentManager;
use crate::providers::CompletionProvider;
use crate::tools;

/// Default result count for semantic search.
pub const DEFAULT_SEARCH_K: usize = 5;

const SENTIMENT_MAX_TOKENS: u32 = 50;
const SENTIMENT_TEMPERATURE: f32 = 0.3;

/// Sentiment text reported when the LLM call fails.
pub const NEUTRAL_SENTIMENT: &str = "neutral";

/// The assembled AI layer
pub struct AiService {
    manager: AgentManager,
    provider: Arc<dyn CompletionProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
}

impl AiService {
    /// Build the service; agent construction is eager, so a bad catalog
    /// fails here instead of on first use. `max_tokens` caps each agent
    /// reply.
    pub fn new(
        catalog: Vec<AgentConfig>,
        provider: Arc<dyn CompletionProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        max_tokens: u32,
    ) -> Result<Self, AiError> {
        let registry = tools::standard_registry(store.clone());
        let manager = AgentManager::new(catalog, provider.clone(), &registry, max_tokens)?;
        info!("AiService: ready with {} agents", manager.count());
        Ok(Self {
            manager,
            provider,
            embedder,
            store,
        })
    }

    pub fn manager(&self) -> &AgentManager {
        &self.manager
    }

    /// Chat with the default agent
    pub async fn generate_response(
        &self,
        user_input: &str,
        context: Option<&Value>,
    ) -> Envelope<ChatReply> {
        self.manager
            .default_agent()
            .respond(user_input, context)
            .await
    }

    /// Pick an agent for the query (keywords, or an explicit id) and run
    /// the turn
    pub async fn route_to_agent(
        &self,
        query: &str,
        agent_type: Option<&str>,
    ) -> Envelope<ChatReply> {
        self.manager.route_to_agent(query, agent_type).await
    }

    /// Ingest a batch of documents into the knowledge base
    ///
    /// All-or-nothing: the receipt reports the full batch size on success
    /// and zero on failure, never a partial count. An empty batch succeeds
    /// without contacting the store.
    pub async fn add_to_knowledge_base(&self, documents: Vec<Document>) -> Envelope<IngestReceipt> {
        if documents.is_empty() {
            return Envelope::success(IngestReceipt::default());
        }

        let count = documents.len();
        match self.store.upsert(&documents).await {
            Ok(()) => Envelope::success(IngestReceipt {
                added_documents: count,
            }),
            Err(e) => {
                error!("Error adding to knowledge base: {}", e);
                Envelope::error(IngestReceipt::default(), AiError::from(e))
            }
        }
    }

    /// Similarity search over the knowledge base
    ///
    /// An empty match set is a success with an empty `results` array; a
    /// store failure is an error envelope with the same shape. Only
    /// `status` tells them apart.
    pub async fn semantic_search(&self, query: &str, k: usize) -> Envelope<SearchResults> {
        match self.store.search(query, k).await {
            Ok(results) => Envelope::success(SearchResults {
                query: query.to_string(),
                results,
            }),
            Err(e) => {
                error!("Error in semantic search: {}", e);
                Envelope::error(
                    SearchResults {
                        query: query.to_string(),
                        results: Vec::new(),
                    },
                    AiError::from(e),
                )
            }
        }
    }

    /// Embed a batch of texts
    ///
    /// An empty batch succeeds without contacting the embedding service.
    pub async fn generate_embeddings(&self, texts: &[String]) -> Envelope<EmbeddingBatch> {
        if texts.is_empty() {
            return Envelope::success(EmbeddingBatch::default());
        }

        match self.embedder.embed(texts).await {
            Ok(embeddings) => {
                let count = embeddings.len();
                Envelope::success(EmbeddingBatch { embeddings, count })
            }
            Err(e) => {
                error!("Error generating embeddings: {}", e);
                Envelope::error(EmbeddingBatch::default(), AiError::from(e))
            }
        }
    }

    /// Score the sentiment of a text with the LLM
    pub async fn analyze_sentiment(&self, text: &str) -> Envelope<SentimentReport> {
        let prompt = format!(
            "Analyze the sentiment of this text and provide a score from -1 (very negative) to 1 (very positive):\n\n{}\n\nSentiment analysis:",
            text
        );

        match self
            .provider
            .complete(&prompt, SENTIMENT_MAX_TOKENS, SENTIMENT_TEMPERATURE)
            .await
        {
            Ok(analysis) => Envelope::success(SentimentReport {
                text: text.to_string(),
                sentiment_analysis: analysis.trim().to_string(),
            }),
            Err(e) => {
                error!("Error analyzing sentiment: {}", e);
                Envelope::error(
                    SentimentReport {
                        text: text.to_string(),
                        sentiment_analysis: NEUTRAL_SENTIMENT.to_string(),
                    },
                    e,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::MAX_REPLY_TOKENS;
    use crate::catalog::default_catalog;
    use async_trait::async_trait;
    use polymind_knowledge::{KnowledgeError, ScoredDocument};
    use serde_json::Map;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider {
        reply: String,
        prompts: StdMutex<Vec<String>>,
    }

    impl FixedProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: StdMutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for FixedProvider {
        fn provider_name(&self) -> &str {
            "fixed"
        }

        fn model(&self) -> &str {
            "fixed-1"
        }

        async fn complete(
            &self,
            prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl CompletionProvider for FailingProvider {
        fn provider_name(&self) -> &str {
            "failing"
        }

        fn model(&self) -> &str {
            "failing-1"
        }

        async fn complete(
            &self,
            _prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String, AiError> {
            Err(AiError::Provider("model offline".to_string()))
        }
    }

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    impl CountingEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, KnowledgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| vec![0.5; 4]).collect())
        }

        fn dimension(&self) -> usize {
            4
        }
    }

    /// Naive in-memory store: substring match, score 1.0
    struct MemoryStore {
        docs: StdMutex<Vec<Document>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                docs: StdMutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VectorStore for MemoryStore {
        async fn upsert(&self, documents: &[Document]) -> Result<(), KnowledgeError> {
            self.docs.lock().unwrap().extend_from_slice(documents);
            Ok(())
        }

        async fn search(
            &self,
            query: &str,
            k: usize,
        ) -> Result<Vec<ScoredDocument>, KnowledgeError> {
            let lower = query.to_lowercase();
            Ok(self
                .docs
                .lock()
                .unwrap()
                .iter()
                .filter(|d| d.content.to_lowercase().contains(&lower))
                .take(k)
                .map(|d| ScoredDocument {
                    content: d.content.clone(),
                    metadata: d.metadata.clone(),
                    similarity_score: 1.0,
                })
                .collect())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl VectorStore for BrokenStore {
        async fn upsert(&self, _documents: &[Document]) -> Result<(), KnowledgeError> {
            Err(KnowledgeError::Store("qdrant unreachable".to_string()))
        }

        async fn search(
            &self,
            _query: &str,
            _k: usize,
        ) -> Result<Vec<ScoredDocument>, KnowledgeError> {
            Err(KnowledgeError::Store("qdrant unreachable".to_string()))
        }
    }

    fn service_with(
        provider: Arc<dyn CompletionProvider>,
        store: Arc<dyn VectorStore>,
    ) -> AiService {
        AiService::new(
            default_catalog(),
            provider,
            Arc::new(CountingEmbedder::new()),
            store,
            MAX_REPLY_TOKENS,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_response_success() {
        let svc = service_with(
            Arc::new(FixedProvider::new("hello from the agent")),
            Arc::new(MemoryStore::new()),
        );
        let envelope = svc.generate_response("hi", None).await;
        assert!(envelope.is_success());
        assert_eq!(envelope.payload.response, "hello from the agent");
    }

    #[tokio::test]
    async fn test_route_to_agent_with_explicit_id() {
        let svc = service_with(
            Arc::new(FixedProvider::new("creative output")),
            Arc::new(MemoryStore::new()),
        );
        let envelope = svc
            .route_to_agent("please schedule a task", Some("creative_agent"))
            .await;
        assert!(envelope.is_success());
        assert_eq!(envelope.payload.response, "creative output");
    }

    #[tokio::test]
    async fn test_ingest_counts_documents() {
        let svc = service_with(
            Arc::new(FixedProvider::new("unused")),
            Arc::new(MemoryStore::new()),
        );
        let docs = vec![Document::new("a"), Document::new("b")];
        let envelope = svc.add_to_knowledge_base(docs).await;
        assert!(envelope.is_success());
        assert_eq!(envelope.payload.added_documents, 2);
    }

    #[tokio::test]
    async fn test_ingest_failure_reports_zero() {
        let svc = service_with(Arc::new(FixedProvider::new("unused")), Arc::new(BrokenStore));
        let envelope = svc.add_to_knowledge_base(vec![Document::new("a")]).await;
        assert!(envelope.is_error());
        assert_eq!(envelope.payload.added_documents, 0);
        assert!(envelope.error.as_deref().unwrap().contains("qdrant unreachable"));
    }

    #[tokio::test]
    async fn test_ingest_empty_batch_skips_store() {
        // BrokenStore fails every upsert, so success proves the store was
        // never consulted
        let svc = service_with(Arc::new(FixedProvider::new("unused")), Arc::new(BrokenStore));
        let envelope = svc.add_to_knowledge_base(Vec::new()).await;
        assert!(envelope.is_success());
        assert_eq!(envelope.payload.added_documents, 0);
        assert!(envelope.error.is_none());
    }

    #[tokio::test]
    async fn test_ingest_then_search_round_trip() {
        let svc = service_with(
            Arc::new(FixedProvider::new("unused")),
            Arc::new(MemoryStore::new()),
        );

        let mut metadata = Map::new();
        metadata.insert(
            "source".to_string(),
            Value::String("handbook".to_string()),
        );
        let doc = Document::new("Rust enforces ownership at compile time").with_metadata(metadata);
        svc.add_to_knowledge_base(vec![doc.clone()]).await;

        let envelope = svc.semantic_search("ownership", 5).await;
        assert!(envelope.is_success());
        assert_eq!(envelope.payload.query, "ownership");
        assert_eq!(envelope.payload.results.len(), 1);
        assert_eq!(envelope.payload.results[0].content, doc.content);
        assert_eq!(envelope.payload.results[0].metadata, doc.metadata);
    }

    #[tokio::test]
    async fn test_search_empty_match_is_success() {
        let svc = service_with(
            Arc::new(FixedProvider::new("unused")),
            Arc::new(MemoryStore::new()),
        );
        let envelope = svc.semantic_search("nothing indexed", 5).await;
        assert!(envelope.is_success());
        assert!(envelope.payload.results.is_empty());
        assert!(envelope.error.is_none());
    }

    #[tokio::test]
    async fn test_search_failure_is_error_with_empty_results() {
        let svc = service_with(Arc::new(FixedProvider::new("unused")), Arc::new(BrokenStore));
        let envelope = svc.semantic_search("anything", 5).await;
        assert!(envelope.is_error());
        assert_eq!(envelope.payload.query, "anything");
        assert!(envelope.payload.results.is_empty());
        assert!(envelope.error.is_some());
    }

    #[tokio::test]
    async fn test_generate_embeddings_batch() {
        let svc = service_with(
            Arc::new(FixedProvider::new("unused")),
            Arc::new(MemoryStore::new()),
        );
        let texts = vec!["one".to_string(), "two".to_string()];
        let envelope = svc.generate_embeddings(&texts).await;
        assert!(envelope.is_success());
        assert_eq!(envelope.payload.count, 2);
        assert_eq!(envelope.payload.embeddings.len(), 2);
    }

    #[tokio::test]
    async fn test_generate_embeddings_empty_batch_skips_embedder() {
        let embedder = Arc::new(CountingEmbedder::new());
        let svc = AiService::new(
            default_catalog(),
            Arc::new(FixedProvider::new("unused")),
            embedder.clone(),
            Arc::new(MemoryStore::new()),
            MAX_REPLY_TOKENS,
        )
        .unwrap();

        let envelope = svc.generate_embeddings(&[]).await;
        assert!(envelope.is_success());
        assert_eq!(envelope.payload.count, 0);
        assert!(envelope.payload.embeddings.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_sentiment_success() {
        let provider = Arc::new(FixedProvider::new("  0.8 (clearly positive)  "));
        let svc = service_with(provider.clone(), Arc::new(MemoryStore::new()));

        let envelope = svc.analyze_sentiment("what a great day").await;
        assert!(envelope.is_success());
        assert_eq!(envelope.payload.text, "what a great day");
        assert_eq!(envelope.payload.sentiment_analysis, "0.8 (clearly positive)");

        let prompt = provider.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("score from -1 (very negative) to 1 (very positive)"));
        assert!(prompt.contains("what a great day"));
        assert!(prompt.trim_end().ends_with("Sentiment analysis:"));
    }

    #[tokio::test]
    async fn test_analyze_sentiment_failure_falls_back_to_neutral() {
        let svc = service_with(Arc::new(FailingProvider), Arc::new(MemoryStore::new()));
        let envelope = svc.analyze_sentiment("some text").await;
        assert!(envelope.is_error());
        assert_eq!(envelope.payload.sentiment_analysis, NEUTRAL_SENTIMENT);
        assert_eq!(envelope.payload.text, "some text");
        assert!(envelope.error.as_deref().unwrap().contains("model offline"));
    }

    #[tokio::test]
    async fn test_failed_chat_turn_returns_fixed_reply() {
        let svc = service_with(Arc::new(FailingProvider), Arc::new(MemoryStore::new()));
        let envelope = svc.generate_response("hi", None).await;
        assert!(envelope.is_error());
        assert_eq!(envelope.payload.response, crate::agent::FALLBACK_REPLY);
    }
}
