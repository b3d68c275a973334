//! Core domain types shared by the gateway and the session layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A research paper as the rest of the system sees it.
///
/// `link` is the identity: a canonical source URL (for arXiv results the
/// Atom entry id). No list in the system ever holds two papers with the
/// same link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    pub summary: String,
    pub authors: Vec<String>,
    pub link: String,
}

impl Paper {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        authors: Vec<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            authors,
            link: link.into(),
        }
    }
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Bot => "bot",
        }
    }

    pub fn from_str_loose(s: &str) -> Self {
        match s {
            "user" => ChatRole::User,
            // "assistant" appears in older rows
            _ => ChatRole::Bot,
        }
    }
}

/// A single chat message.
///
/// `created_at` is assigned at persistence time and is `None` for
/// messages that only exist in local state (including the transient
/// placeholder shown while a reply is pending - placeholders are never
/// persisted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            created_at: None,
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            content: content.into(),
            created_at: None,
        }
    }
}

/// Conversation order per paper, keyed by `Paper::link`.
pub type ChatHistory = HashMap<String, Vec<ChatMessage>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(ChatRole::from_str_loose("user"), ChatRole::User);
        assert_eq!(ChatRole::from_str_loose("bot"), ChatRole::Bot);
        assert_eq!(ChatRole::from_str_loose("assistant"), ChatRole::Bot);
    }

    #[test]
    fn test_message_serde_shape() {
        let msg = ChatMessage::user("what is the main result?");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("created_at").is_none());
    }
}
