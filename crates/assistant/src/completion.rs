//! OpenAI-compatible chat-completion client.

use paperdesk_common::config::AssistantConfig;
use paperdesk_common::errors::{AppError, Result};
use paperdesk_common::types::{ChatMessage, ChatRole, Paper};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible /chat/completions endpoint.
pub struct CompletionClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl CompletionClient {
    /// Build a client from config. Returns None when no API key is
    /// configured; the caller then answers with fallbacks only.
    pub fn from_config(config: &AssistantConfig) -> Result<Option<Self>> {
        let Some(ref api_key) = config.api_key else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to build completion HTTP client: {}", e),
            })?;

        Ok(Some(Self {
            client,
            api_key: api_key.clone(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }))
    }

    /// Ask the model about a paper. Recent history rides along so the
    /// model can pick up the thread of the conversation.
    pub async fn complete(
        &self,
        user_message: &str,
        paper: &Paper,
        history: &[ChatMessage],
    ) -> Result<String> {
        let mut messages: Vec<WireMessage> = history
            .iter()
            .rev()
            .take(4)
            .rev()
            .map(|m| WireMessage {
                role: match m.role {
                    ChatRole::User => "user",
                    ChatRole::Bot => "assistant",
                },
                content: m.content.clone(),
            })
            .collect();

        messages.push(WireMessage {
            role: "user",
            content: build_prompt(user_message, paper),
        });

        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Completion {
                message: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(AppError::Completion {
                message: format!("Completion API responded with status {}", response.status()),
            });
        }

        let body: CompletionResponse =
            response.json().await.map_err(|e| AppError::Completion {
                message: format!("Malformed completion response: {}", e),
            })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::Completion {
                message: "Completion response contained no content".to_string(),
            })
    }
}

/// Instruct-style prompt grounding the question in the paper.
fn build_prompt(user_message: &str, paper: &Paper) -> String {
    format!(
        "[INST] Based on the following paper, answer the user's question.\n\n\
         Title: {}\nAbstract: {}\n\nQuestion: {} [/INST]",
        paper.title, paper.summary, user_message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperdesk_common::config::AssistantConfig;

    #[test]
    fn test_no_api_key_means_no_client() {
        let config = AssistantConfig {
            api_key: None,
            api_base: "https://api.together.xyz/v1".into(),
            model: "test-model".into(),
            temperature: 0.7,
            max_tokens: 800,
            timeout_secs: 30,
        };
        assert!(CompletionClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_prompt_contains_paper_context() {
        let paper = Paper::new(
            "Attention Is All You Need",
            "We propose the Transformer.",
            vec!["Ashish Vaswani".into()],
            "http://arxiv.org/abs/1706.03762v7",
        );
        let prompt = build_prompt("what is new here?", &paper);
        assert!(prompt.contains("Attention Is All You Need"));
        assert!(prompt.contains("We propose the Transformer."));
        assert!(prompt.contains("what is new here?"));
    }
}
