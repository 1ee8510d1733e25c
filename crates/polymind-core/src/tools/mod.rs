//! Tool registry and dispatch

use async_trait::async_trait;
use polymind_knowledge::VectorStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AiError;

pub mod knowledge;
pub mod stubs;

pub use knowledge::KnowledgeSearchTool;
pub use stubs::{DataAnalysisTool, TaskSchedulerTool};

/// Individual tool handler
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    async fn call(&self, input: &str) -> Result<String, AiError>;
}

/// Registry of available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool handler
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let name = handler.name().to_string();
        debug!("Registering tool: {}", name);
        self.tools.insert(name, handler);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).cloned()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registry restricted to the named tools; unknown names are skipped
    pub fn subset(&self, names: &[String]) -> ToolRegistry {
        let mut subset = ToolRegistry::new();
        for name in names {
            if let Some(handler) = self.tools.get(name) {
                subset.tools.insert(name.clone(), handler.clone());
            }
        }
        subset
    }

    /// (name, description) pairs, sorted by name for stable prompts
    pub fn describe(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .tools
            .values()
            .map(|handler| (handler.name().to_string(), handler.description().to_string()))
            .collect();
        pairs.sort();
        pairs
    }

    /// Run a tool, flattening every failure into the returned string
    pub async fn dispatch(&self, name: &str, input: &str) -> String {
        debug!("Dispatching tool: {} with input: {:?}", name, input);

        let Some(handler) = self.tools.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return format!("Unknown tool: {}", name);
        };

        match handler.call(input).await {
            Ok(result) => {
                debug!("Tool {} succeeded", name);
                result
            }
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                format!("Error: {}", e)
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry holding the built-in tools, wired to the given store
pub fn standard_registry(store: Arc<dyn VectorStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(KnowledgeSearchTool::new(store)));
    registry.register(Arc::new(DataAnalysisTool));
    registry.register(Arc::new(TaskSchedulerTool));
    registry
}
