//! Agent catalog
//!
//! The catalog is the declarative list of specialist agents a deployment
//! runs. [`default_catalog`] ships the four built-ins; configuration can
//! replace the whole list.

use serde::{Deserialize, Serialize};

use crate::error::AiError;

fn default_temperature() -> f32 {
    0.7
}

/// Declarative description of one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Stable identifier, used for routing and explicit selection
    pub id: String,
    /// Human-readable name shown in prompts and listings
    pub display_name: String,
    /// One-line specialty, woven into the agent's prompt
    pub description: String,
    /// Tool names this agent may call; unregistered names are skipped
    #[serde(default)]
    pub tools: Vec<String>,
    /// Sampling temperature for this agent's completions
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl AgentConfig {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        tools: Vec<&str>,
        temperature: f32,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: description.into(),
            tools: tools.into_iter().map(String::from).collect(),
            temperature,
        }
    }

    /// Reject configs that would break routing or completions
    pub fn validate(&self) -> Result<(), AiError> {
        if self.id.trim().is_empty() {
            return Err(AiError::Validation("agent id must not be blank".to_string()));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(AiError::Validation(format!(
                "agent '{}' temperature {} outside [0, 1]",
                self.id, self.temperature
            )));
        }
        Ok(())
    }
}

/// The four built-in specialist agents
pub fn default_catalog() -> Vec<AgentConfig> {
    vec![
        AgentConfig::new(
            "research_agent",
            "Research Agent",
            "Specialized in research and information gathering",
            vec!["knowledge_search", "web_search"],
            0.3,
        ),
        AgentConfig::new(
            "creative_agent",
            "Creative Agent",
            "Specialized in creative tasks and content generation",
            vec!["text_generation", "idea_generation"],
            0.8,
        ),
        AgentConfig::new(
            "analytical_agent",
            "Analytical Agent",
            "Specialized in data analysis and insights",
            vec!["data_analysis", "chart_generation"],
            0.2,
        ),
        AgentConfig::new(
            "task_agent",
            "Task Agent",
            "Specialized in task management and scheduling",
            vec!["task_scheduler", "calendar_integration"],
            0.1,
        ),
    ]
}
