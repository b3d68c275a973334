//! The persistence interface the workspace consumes.

use async_trait::async_trait;
use paperdesk_common::errors::Result;
use paperdesk_common::types::{ChatMessage, Paper};

/// Remote persistence operations, one per workspace concern.
///
/// The workspace is constructed with an implementation of this trait
/// (the HTTP-backed [`crate::RemoteStore`] in production, an in-memory
/// mock in tests), so state logic is testable without a server.
#[async_trait]
pub trait PaperStore: Send + Sync {
    /// Fetch the saved-library list.
    async fn fetch_library(&self) -> Result<Vec<Paper>>;

    /// Fetch the chatted-papers list.
    async fn fetch_history(&self) -> Result<Vec<Paper>>;

    /// Fetch the recently-viewed list, most recent first.
    async fn fetch_recently_viewed(&self) -> Result<Vec<Paper>>;

    /// Save a paper to the library. Saving an already-saved paper is
    /// not an error.
    async fn save_to_library(&self, paper: &Paper) -> Result<()>;

    /// Remove a paper from the library.
    async fn delete_from_library(&self, link: &str) -> Result<()>;

    /// Record a view (upsert: re-viewing refreshes the timestamp).
    async fn record_view(&self, paper: &Paper) -> Result<()>;

    /// Remove a paper from the recently-viewed set.
    async fn delete_recently_viewed(&self, link: &str) -> Result<()>;

    /// Persist the paper record backing a history entry.
    async fn record_history(&self, paper: &Paper) -> Result<()>;

    /// Delete the chat history for a paper.
    async fn delete_history(&self, link: &str) -> Result<()>;

    /// Persist a single chat message.
    async fn persist_message(&self, paper: &Paper, message: &ChatMessage) -> Result<()>;

    /// Fetch the persisted conversation for a paper, in order.
    async fn fetch_chat(&self, link: &str) -> Result<Vec<ChatMessage>>;
}
