//! OpenAI completion provider (gpt-4o, gpt-4o-mini, etc.)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::CompletionProvider;
use crate::error::AiError;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// OpenAI chat-completions client driven as a plain prompt completer
pub struct OpenAiCompletions {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for OpenAiCompletions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompletions")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiCompletions {
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

    /// Pull the completion text out of an API response
    fn from_chat_response(resp: ChatApiResponse) -> Result<String, AiError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::Provider("OpenAI response had no choices".to_string()))?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletions {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, AiError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "messages": [{"role": "user", "content": prompt}],
        });

        debug!(
            "OpenAI request: model={}, max_tokens={}, temperature={}",
            self.model, max_tokens, temperature
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
                AiError::Provider(format!("failed to send request to OpenAI API: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AiError::Provider(format!(
                "OpenAI API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatApiResponse = response.json().await.map_err(|e| {
            AiError::Provider(format!("failed to parse OpenAI API response: {}", e))
        })?;

        Self::from_chat_response(api_response)
    }
}

// ── OpenAI wire types ──

#[derive(Debug, Clone, Deserialize)]
struct ChatApiResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_chat_response_text() {
        let resp = ChatApiResponse {
            choices: vec![ChatChoice {
                message: ChatChoiceMessage {
                    content: Some("Hello!".to_string()),
                },
            }],
        };
        assert_eq!(OpenAiCompletions::from_chat_response(resp).unwrap(), "Hello!");
    }

    #[test]
    fn test_from_chat_response_no_choices() {
        let resp = ChatApiResponse { choices: vec![] };
        let err = OpenAiCompletions::from_chat_response(resp).unwrap_err();
        assert!(matches!(err, AiError::Provider(_)));
    }

    #[test]
    fn test_from_chat_response_null_content() {
        let resp = ChatApiResponse {
            choices: vec![ChatChoice {
                message: ChatChoiceMessage { content: None },
            }],
        };
        assert_eq!(OpenAiCompletions::from_chat_response(resp).unwrap(), "");
    }

    #[test]
    fn test_chat_response_parses_openai_json() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hi"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 5, "completion_tokens": 1}
        }"#;
        let resp: ChatApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("hi"));
    }

    #[test]
    fn test_completions_debug_hides_key() {
        let provider = OpenAiCompletions::new(
            "sk-secret-key".to_string(),
            "gpt-4o".to_string(),
            "https://api.openai.com".to_string(),
        );
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("sk-secret-key"));
    }
}
