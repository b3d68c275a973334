//! PaperDesk Conversation Responder
//!
//! Given a user message and a paper, produces a reply: normally by
//! delegating to an OpenAI-compatible completion API, and on any failure
//! (network error, malformed payload, missing credential) by
//! substituting a deterministic rule-based reply built from the paper
//! context alone. The caller never sees an error; the conversation
//! never stalls.

mod completion;
mod fallback;
mod intent;

pub use completion::CompletionClient;
pub use fallback::fallback_reply;
pub use intent::{classify, Intent};

use metrics::counter;
use paperdesk_common::config::AssistantConfig;
use paperdesk_common::errors::Result;
use paperdesk_common::types::{ChatMessage, Paper};

/// The responder: completion client plus fallback policy.
pub struct Responder {
    client: Option<CompletionClient>,
}

impl Responder {
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let client = CompletionClient::from_config(config)?;
        if client.is_none() {
            tracing::warn!("No completion API key configured; replies will use local fallbacks");
        }
        Ok(Self { client })
    }

    /// Build a responder that never calls out. Used in tests and as the
    /// degraded mode when no credential is configured.
    pub fn fallback_only() -> Self {
        Self { client: None }
    }

    /// Produce a reply to a user message about a paper. Infallible by
    /// design: any upstream failure is replaced with the rule-based
    /// fallback.
    pub async fn reply(
        &self,
        user_message: &str,
        paper: &Paper,
        history: &[ChatMessage],
    ) -> String {
        if let Some(ref client) = self.client {
            match client.complete(user_message, paper, history).await {
                Ok(content) => return content,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        paper = %paper.link,
                        "Completion failed; substituting fallback reply"
                    );
                }
            }
        }

        counter!("paperdesk_chat_fallbacks_total").increment(1);
        fallback_reply(classify(user_message), paper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper() -> Paper {
        Paper::new(
            "Attention Is All You Need",
            "We propose a new simple network architecture, the Transformer.",
            vec!["Ashish Vaswani".into()],
            "http://arxiv.org/abs/1706.03762v7",
        )
    }

    #[tokio::test]
    async fn test_reply_without_client_uses_fallback() {
        let responder = Responder::fallback_only();
        let reply = responder.reply("summarize this paper", &paper(), &[]).await;
        assert!(reply.contains("Attention Is All You Need"));
    }

    #[tokio::test]
    async fn test_reply_never_panics_on_odd_input() {
        let responder = Responder::fallback_only();
        let reply = responder.reply("", &paper(), &[]).await;
        assert!(!reply.is_empty());
    }

    #[tokio::test]
    async fn test_failing_client_falls_back() {
        // A client pointed at an unroutable endpoint fails fast and the
        // responder must still answer with the paper's title in it.
        let config = paperdesk_common::config::AssistantConfig {
            api_key: Some("test-key".into()),
            api_base: "http://127.0.0.1:1/v1".into(),
            model: "test-model".into(),
            temperature: 0.7,
            max_tokens: 800,
            timeout_secs: 1,
        };
        let responder = Responder::from_config(&config).unwrap();
        let reply = responder.reply("what are the results?", &paper(), &[]).await;
        assert!(reply.contains("Attention Is All You Need"));
    }
}
