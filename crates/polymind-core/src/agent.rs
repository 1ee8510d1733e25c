//! Agent conversation loop
//!
//! Each agent owns a prompt persona, a tool subset, and its own memory.
//! A turn completes the prompt, runs any tool the model asks for, and
//! feeds the observation back until the model answers in plain text.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::catalog::AgentConfig;
use crate::envelope::{ChatReply, Envelope};
use crate::error::AiError;
use crate::memory::ConversationMemory;
use crate::providers::CompletionProvider;
use crate::tools::ToolRegistry;

/// Maximum transcript size in bytes woven into a prompt.
const MAX_TRANSCRIPT_SIZE: usize = 100_000;

/// Default completion budget for one reply; configuration can override it.
pub const MAX_REPLY_TOKENS: u32 = 1000;

/// Tool invocations allowed within a single turn.
const MAX_TOOL_ROUNDS: usize = 4;

/// Reply carried by the error envelope when a turn fails.
pub const FALLBACK_REPLY: &str =
    "I encountered an error processing your request. Please try again.";

/// One specialist agent
pub struct Agent {
    config: AgentConfig,
    provider: Arc<dyn CompletionProvider>,
    tools: ToolRegistry,
    max_tokens: u32,
    memory: Mutex<ConversationMemory>,
}

impl Agent {
    pub(crate) fn new(
        config: AgentConfig,
        provider: Arc<dyn CompletionProvider>,
        tools: ToolRegistry,
        max_tokens: u32,
    ) -> Self {
        Self {
            config,
            provider,
            tools,
            max_tokens,
            memory: Mutex::new(ConversationMemory::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Number of completed turns in this agent's memory
    pub async fn turn_count(&self) -> usize {
        self.memory.lock().await.len()
    }

    /// Handle one user turn
    ///
    /// `context` is optional structured state from the caller; it is
    /// serialized into the prompt ahead of the user text. The turn is
    /// recorded in memory only when it succeeds.
    pub async fn respond(&self, user_input: &str, context: Option<&Value>) -> Envelope<ChatReply> {
        let input = seed_input(user_input, context);
        debug!(
            "Agent '{}' handling turn ({} chars)",
            self.config.id,
            input.chars().count()
        );

        match self.run_turn(&input).await {
            Ok(reply) => {
                self.memory.lock().await.record(input, reply.clone());
                Envelope::success(ChatReply { response: reply })
            }
            Err(e) => {
                warn!("Agent '{}' turn failed: {}", self.config.id, e);
                Envelope::error(
                    ChatReply {
                        response: FALLBACK_REPLY.to_string(),
                    },
                    e,
                )
            }
        }
    }

    async fn run_turn(&self, input: &str) -> Result<String, AiError> {
        let mut prompt = self.build_prompt(input).await;

        for _ in 0..MAX_TOOL_ROUNDS {
            let completion = self
                .provider
                .complete(&prompt, self.max_tokens, self.config.temperature)
                .await?;

            let Some((tool, tool_input)) = parse_action(&completion) else {
                return Ok(completion.trim().to_string());
            };

            info!("Agent '{}' calling tool '{}'", self.config.id, tool);
            let observation = self.tools.dispatch(tool, tool_input).await;
            prompt.push_str(&format!(
                " Action: {}\nInput: {}\nObservation: {}\nAssistant:",
                tool, tool_input, observation
            ));
        }

        Err(AiError::Provider(format!(
            "tool loop exceeded {} rounds",
            MAX_TOOL_ROUNDS
        )))
    }

    async fn build_prompt(&self, input: &str) -> String {
        let mut prompt = format!(
            "You are {}. {}\n",
            self.config.display_name, self.config.description
        );

        if !self.tools.is_empty() {
            prompt.push_str("\n# TOOLS\n\n");
            for (name, description) in self.tools.describe() {
                prompt.push_str(&format!("- {}: {}\n", name, description));
            }
            prompt.push_str(
                "\nTo call a tool, reply with exactly two lines:\n\
                 Action: <tool name>\n\
                 Input: <tool input>\n\
                 The observation will be appended; answer in plain text once you have enough.\n",
            );
        }

        prompt.push_str("\n# CONVERSATION\n\n");
        let transcript = self.memory.lock().await.transcript(MAX_TRANSCRIPT_SIZE);
        prompt.push_str(&transcript);
        prompt.push_str(&format!("User: {}\nAssistant:", input));
        prompt
    }
}

/// Prefix caller context onto the user text, if any
fn seed_input(user_input: &str, context: Option<&Value>) -> String {
    match context {
        Some(ctx) => format!(
            "Context: {}\n\nUser: {}",
            serde_json::to_string(ctx).unwrap_or_default(),
            user_input
        ),
        None => user_input.to_string(),
    }
}

/// Read a tool request out of a completion
///
/// A request is a leading "Action:" line with the tool name, optionally
/// followed by an "Input:" line. Anything else is a final answer.
fn parse_action(completion: &str) -> Option<(&str, &str)> {
    let mut lines = completion.lines().filter(|l| !l.trim().is_empty());
    let tool = lines.next()?.trim().strip_prefix("Action:")?.trim();
    if tool.is_empty() {
        return None;
    }
    let input = lines
        .next()
        .and_then(|l| l.trim().strip_prefix("Input:"))
        .map(str::trim)
        .unwrap_or("");
    Some((tool, input))
}
