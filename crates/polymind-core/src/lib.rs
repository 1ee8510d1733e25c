//! polymind-core - Agents, routing, and response envelopes
//!
//! This crate provides:
//! - A catalog of specialist agents and a keyword router over them
//! - The agent conversation loop with per-agent memory and tool calls
//! - Pluggable LLM completion providers (OpenAI included)
//! - Tool registry with knowledge-base search and task stubs
//! - Uniform success/error envelopes around every operation

pub mod agent;
pub mod catalog;
pub mod envelope;
pub mod error;
pub mod manager;
pub mod memory;
pub mod providers;
pub mod router;
pub mod service;
pub mod tools;

// Re-export main types for convenience
pub use agent::{Agent, FALLBACK_REPLY, MAX_REPLY_TOKENS};
pub use catalog::{AgentConfig, default_catalog};
pub use envelope::{
    ChatReply, EmbeddingBatch, Envelope, IngestReceipt, SearchResults, SentimentReport, Status,
};
pub use error::AiError;
pub use manager::AgentManager;
pub use memory::ConversationMemory;
pub use providers::{CompletionProvider, OpenAiCompletions};
pub use router::DEFAULT_AGENT_ID;
pub use service::AiService;
pub use tools::{ToolHandler, ToolRegistry};
