//! Agent manager - builds the agent fleet and routes queries to it

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::agent::Agent;
use crate::catalog::AgentConfig;
use crate::envelope::{ChatReply, Envelope};
use crate::error::AiError;
use crate::providers::CompletionProvider;
use crate::router::{self, DEFAULT_AGENT_ID};
use crate::tools::ToolRegistry;

/// Owns every agent in the catalog and picks the right one per query
pub struct AgentManager {
    agents: HashMap<String, Agent>,
    default_id: String,
}

impl AgentManager {
    /// Build all agents up front; any bad config fails the whole catalog
    pub fn new(
        catalog: Vec<AgentConfig>,
        provider: Arc<dyn CompletionProvider>,
        registry: &ToolRegistry,
        max_tokens: u32,
    ) -> Result<Self, AiError> {
        if catalog.is_empty() {
            return Err(AiError::Validation("agent catalog is empty".to_string()));
        }

        let default_id = if catalog.iter().any(|c| c.id == DEFAULT_AGENT_ID) {
            DEFAULT_AGENT_ID.to_string()
        } else {
            catalog[0].id.clone()
        };

        let mut agents = HashMap::new();
        for config in catalog {
            config.validate()?;
            if agents.contains_key(&config.id) {
                return Err(AiError::Validation(format!(
                    "duplicate agent id '{}'",
                    config.id
                )));
            }
            let tools = registry.subset(&config.tools);
            debug!(
                "AgentManager: building agent '{}' ({}) with {} tools",
                config.id,
                config.display_name,
                tools.len()
            );
            agents.insert(
                config.id.clone(),
                Agent::new(config, provider.clone(), tools, max_tokens),
            );
        }

        info!(
            "AgentManager: initialized {} agents, default '{}'",
            agents.len(),
            default_id
        );
        Ok(Self { agents, default_id })
    }

    /// Get an agent by ID
    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.get(id)
    }

    /// The agent that answers unrouted queries
    pub fn default_agent(&self) -> &Agent {
        self.agents
            .get(&self.default_id)
            .expect("default agent must exist")
    }

    /// All agent IDs, sorted
    pub fn agent_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.agents.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over the agents
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Number of registered agents
    pub fn count(&self) -> usize {
        self.agents.len()
    }

    /// Decide which agent should handle `query`
    ///
    /// An explicit id wins when it names a registered agent; unknown ids
    /// fall through to keyword routing, and the default agent catches the
    /// rest.
    pub fn select_agent_id(&self, query: &str, explicit: Option<&str>) -> &str {
        if let Some(id) = explicit {
            if let Some((key, _)) = self.agents.get_key_value(id) {
                return key;
            }
            debug!(
                "AgentManager: unknown agent '{}', falling back to keywords",
                id
            );
        }

        if let Some(id) = router::keyword_route(query, |id| self.agents.contains_key(id)) {
            return id;
        }

        &self.default_id
    }

    /// Route a query to the right agent and run the turn
    pub async fn route_to_agent(
        &self,
        query: &str,
        agent_type: Option<&str>,
    ) -> Envelope<ChatReply> {
        let id = self.select_agent_id(query, agent_type);
        debug!("AgentManager: routed query to agent '{}'", id);
        let agent = self.agents.get(id).expect("selected agent must exist");
        agent.respond(query, None).await
    }
}
