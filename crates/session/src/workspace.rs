//! The workspace: single in-memory coordination point for all paper,
//! chat, library, and recency state visible to the UI.
//!
//! Every method runs on the UI event loop (`&mut self`, no locks);
//! concurrency is limited to in-flight requests whose completions the
//! loop interleaves. The only explicit guard is the single-flight
//! `saving` flag on library saves.

use crate::store::PaperStore;
use paperdesk_common::errors::Result;
use paperdesk_common::types::{ChatHistory, ChatMessage, ChatRole, Paper};
use std::sync::Arc;
use tracing::warn;

/// Placeholder shown while a reply is pending. Lives only in local
/// state; it is replaced, never persisted.
pub const PENDING_PLACEHOLDER: &str = "…";

/// Browse-search state. Plain local state with no persistence; exists
/// so the browse view survives re-renders within a single mount.
#[derive(Debug, Clone)]
pub struct BrowseState {
    pub query: String,
    pub papers: Vec<Paper>,
    pub searched: bool,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            query: "large language models".to_string(),
            papers: Vec::new(),
            searched: false,
        }
    }
}

/// Client-resident state container; mirrors persisted state and applies
/// the optimistic-update / best-effort-persistence policies.
pub struct Workspace {
    store: Arc<dyn PaperStore>,

    current_paper: Option<Paper>,
    saved_papers: Vec<Paper>,
    recently_viewed: Vec<Paper>,
    history_papers: Vec<Paper>,
    chat_history: ChatHistory,
    browse: BrowseState,

    loading: bool,
    saving: bool,
}

impl Workspace {
    /// Create a workspace around an injected store. State starts empty
    /// and `is_loading` stays true until `load_initial` completes.
    pub fn new(store: Arc<dyn PaperStore>) -> Self {
        Self {
            store,
            current_paper: None,
            saved_papers: Vec::new(),
            recently_viewed: Vec::new(),
            history_papers: Vec::new(),
            chat_history: ChatHistory::new(),
            browse: BrowseState::default(),
            loading: true,
            saving: false,
        }
    }

    // ========================================================================
    // Initial load
    // ========================================================================

    /// Fetch library, history, and recently-viewed jointly. Each slice
    /// is applied independently on success; a failed fetch leaves its
    /// slice at the prior (empty) value. Unauthenticated sessions skip
    /// the fetches and finish loading immediately.
    pub async fn load_initial(&mut self, authenticated: bool) {
        self.loading = true;

        if !authenticated {
            self.loading = false;
            return;
        }

        let (library, history, recent) = tokio::join!(
            self.store.fetch_library(),
            self.store.fetch_history(),
            self.store.fetch_recently_viewed(),
        );

        match library {
            Ok(papers) => self.saved_papers = papers,
            Err(e) => warn!(error = %e, "Failed to load library"),
        }
        match history {
            Ok(papers) => self.history_papers = papers,
            Err(e) => warn!(error = %e, "Failed to load history"),
        }
        match recent {
            Ok(papers) => self.recently_viewed = papers,
            Err(e) => warn!(error = %e, "Failed to load recently viewed"),
        }

        self.loading = false;
    }

    // ========================================================================
    // Current paper & recency
    // ========================================================================

    /// Set the active paper. A paper not already in history moves to
    /// the front of recently-viewed and the view is persisted
    /// fire-and-forget; persistence failure does not revert the list.
    pub async fn set_current_paper(&mut self, paper: Option<Paper>) {
        self.current_paper = paper.clone();

        let Some(paper) = paper else { return };

        if self.is_in_history(&paper.link) {
            return;
        }

        // Move-to-front: drop any prior occurrence of the same link.
        self.recently_viewed.retain(|p| p.link != paper.link);
        self.recently_viewed.insert(0, paper.clone());

        if let Err(e) = self.store.record_view(&paper).await {
            warn!(error = %e, paper = %paper.link, "Failed to persist view");
        }
    }

    pub fn current_paper(&self) -> Option<&Paper> {
        self.current_paper.as_ref()
    }

    /// Optimistic removal; no rollback if the remote delete fails.
    pub async fn remove_paper_from_recently_viewed(&mut self, link: &str) {
        self.recently_viewed.retain(|p| p.link != link);

        if let Err(e) = self.store.delete_recently_viewed(link).await {
            warn!(error = %e, paper = %link, "Failed to delete recently-viewed entry");
        }
    }

    // ========================================================================
    // Library
    // ========================================================================

    /// Save a paper to the library.
    ///
    /// No-op when the paper is already saved or while another save is
    /// in flight; the guard is deliberately global (one save at a time
    /// system-wide), matching the double-trigger case it exists for.
    /// Unlike every other mutation the local append waits for the
    /// remote write, so the saved indicator never shows a paper the
    /// server did not accept. The guard clears on every path.
    pub async fn add_paper_to_library(&mut self, paper: Paper) {
        if self.is_paper_in_library(&paper.link) || self.saving {
            return;
        }

        self.saving = true;

        match self.store.save_to_library(&paper).await {
            Ok(()) => self.saved_papers.push(paper),
            Err(e) => warn!(error = %e, paper = %paper.link, "Failed to save paper to library"),
        }

        self.saving = false;
    }

    pub fn is_paper_in_library(&self, link: &str) -> bool {
        self.saved_papers.iter().any(|p| p.link == link)
    }

    /// Optimistic removal; no rollback if the remote delete fails.
    pub async fn remove_paper_from_library(&mut self, link: &str) {
        self.saved_papers.retain(|p| p.link != link);

        if let Err(e) = self.store.delete_from_library(link).await {
            warn!(error = %e, paper = %link, "Failed to delete library entry");
        }
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Append a message to the paper's conversation and persist it.
    ///
    /// The first user message ever recorded for a paper also promotes
    /// the paper from recently-viewed to history: prepended to the
    /// history list, persisted as a history record, and removed from
    /// recently-viewed both locally and remotely.
    pub async fn add_message_to_chat(&mut self, paper: &Paper, message: ChatMessage) {
        let entry = self.chat_history.entry(paper.link.clone()).or_default();
        let first_message = entry.is_empty();
        let from_user = message.role == ChatRole::User;
        entry.push(message.clone());

        if let Err(e) = self.store.persist_message(paper, &message).await {
            warn!(error = %e, paper = %paper.link, "Failed to persist chat message");
        }

        if from_user && first_message {
            if !self.is_in_history(&paper.link) {
                self.history_papers.insert(0, paper.clone());
            }

            if let Err(e) = self.store.record_history(paper).await {
                warn!(error = %e, paper = %paper.link, "Failed to persist history record");
            }

            self.remove_paper_from_recently_viewed(&paper.link).await;
        }
    }

    /// Append the pending-reply placeholder locally. Never persisted;
    /// the caller swaps it out with `replace_last_chat_message`.
    pub fn push_pending_reply(&mut self, link: &str) {
        self.chat_history
            .entry(link.to_string())
            .or_default()
            .push(ChatMessage::bot(PENDING_PLACEHOLDER));
    }

    /// Overwrite the final message of a conversation (placeholder →
    /// real reply, or → error text). No-op on an empty conversation;
    /// never changes the conversation length.
    pub fn replace_last_chat_message(&mut self, link: &str, new_message: ChatMessage) {
        if let Some(messages) = self.chat_history.get_mut(link) {
            if let Some(last) = messages.last_mut() {
                *last = new_message;
            }
        }
    }

    pub fn get_chat_for_paper(&self, link: &str) -> &[ChatMessage] {
        self.chat_history.get(link).map_or(&[], Vec::as_slice)
    }

    /// Install the persisted conversation for a paper, unless local
    /// state already has one (avoids refetching over in-progress local
    /// edits). A paper with persisted messages is ensured into history
    /// and dropped from the local recently-viewed list.
    pub async fn load_chat_for_paper(&mut self, paper: &Paper) {
        let has_local = self
            .chat_history
            .get(&paper.link)
            .is_some_and(|m| !m.is_empty());
        if has_local {
            return;
        }

        match self.store.fetch_chat(&paper.link).await {
            Ok(messages) if !messages.is_empty() => {
                self.chat_history.insert(paper.link.clone(), messages);

                if !self.is_in_history(&paper.link) {
                    self.history_papers.insert(0, paper.clone());
                }

                self.recently_viewed.retain(|p| p.link != paper.link);
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, paper = %paper.link, "Failed to load chat history"),
        }
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Remove a paper from history: the list entry and the local
    /// conversation go first, then the remote delete.
    pub async fn remove_paper_from_history(&mut self, link: &str) {
        self.history_papers.retain(|p| p.link != link);
        self.chat_history.remove(link);

        if let Err(e) = self.store.delete_history(link).await {
            warn!(error = %e, paper = %link, "Failed to delete chat history");
        }
    }

    fn is_in_history(&self, link: &str) -> bool {
        self.history_papers.iter().any(|p| p.link == link)
    }

    // ========================================================================
    // Accessors & browse state
    // ========================================================================

    pub fn saved_papers(&self) -> &[Paper] {
        &self.saved_papers
    }

    pub fn recently_viewed(&self) -> &[Paper] {
        &self.recently_viewed
    }

    pub fn history_papers(&self) -> &[Paper] {
        &self.history_papers
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn browse(&self) -> &BrowseState {
        &self.browse
    }

    pub fn set_browse_query(&mut self, query: impl Into<String>) {
        self.browse.query = query.into();
    }

    pub fn set_browse_papers(&mut self, papers: Vec<Paper>) {
        self.browse.papers = papers;
    }

    pub fn set_browse_searched(&mut self, searched: bool) {
        self.browse.searched = searched;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use paperdesk_common::errors::AppError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory store recording calls, with per-operation failure
    /// injection.
    #[derive(Default)]
    struct MockStore {
        calls: Mutex<Vec<String>>,
        library: Mutex<Vec<Paper>>,
        history: Mutex<Vec<Paper>>,
        recent: Mutex<Vec<Paper>>,
        chats: Mutex<HashMap<String, Vec<ChatMessage>>>,
        fail_saves: AtomicBool,
        fail_deletes: AtomicBool,
        fail_fetches: AtomicBool,
    }

    impl MockStore {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn failure() -> AppError {
            AppError::Internal {
                message: "injected failure".into(),
            }
        }
    }

    #[async_trait]
    impl PaperStore for MockStore {
        async fn fetch_library(&self) -> Result<Vec<Paper>> {
            self.record("fetch_library");
            if self.fail_fetches.load(Ordering::SeqCst) {
                return Err(Self::failure());
            }
            Ok(self.library.lock().unwrap().clone())
        }

        async fn fetch_history(&self) -> Result<Vec<Paper>> {
            self.record("fetch_history");
            if self.fail_fetches.load(Ordering::SeqCst) {
                return Err(Self::failure());
            }
            Ok(self.history.lock().unwrap().clone())
        }

        async fn fetch_recently_viewed(&self) -> Result<Vec<Paper>> {
            self.record("fetch_recently_viewed");
            if self.fail_fetches.load(Ordering::SeqCst) {
                return Err(Self::failure());
            }
            Ok(self.recent.lock().unwrap().clone())
        }

        async fn save_to_library(&self, paper: &Paper) -> Result<()> {
            self.record(format!("save_to_library:{}", paper.link));
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(Self::failure());
            }
            let mut library = self.library.lock().unwrap();
            if !library.iter().any(|p| p.link == paper.link) {
                library.push(paper.clone());
            }
            Ok(())
        }

        async fn delete_from_library(&self, link: &str) -> Result<()> {
            self.record(format!("delete_from_library:{}", link));
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(Self::failure());
            }
            self.library.lock().unwrap().retain(|p| p.link != link);
            Ok(())
        }

        async fn record_view(&self, paper: &Paper) -> Result<()> {
            self.record(format!("record_view:{}", paper.link));
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(Self::failure());
            }
            Ok(())
        }

        async fn delete_recently_viewed(&self, link: &str) -> Result<()> {
            self.record(format!("delete_recently_viewed:{}", link));
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(Self::failure());
            }
            self.recent.lock().unwrap().retain(|p| p.link != link);
            Ok(())
        }

        async fn record_history(&self, paper: &Paper) -> Result<()> {
            self.record(format!("record_history:{}", paper.link));
            Ok(())
        }

        async fn delete_history(&self, link: &str) -> Result<()> {
            self.record(format!("delete_history:{}", link));
            self.chats.lock().unwrap().remove(link);
            Ok(())
        }

        async fn persist_message(&self, paper: &Paper, message: &ChatMessage) -> Result<()> {
            self.record(format!("persist_message:{}", paper.link));
            self.chats
                .lock()
                .unwrap()
                .entry(paper.link.clone())
                .or_default()
                .push(message.clone());
            Ok(())
        }

        async fn fetch_chat(&self, link: &str) -> Result<Vec<ChatMessage>> {
            self.record(format!("fetch_chat:{}", link));
            if self.fail_fetches.load(Ordering::SeqCst) {
                return Err(Self::failure());
            }
            Ok(self.chats.lock().unwrap().get(link).cloned().unwrap_or_default())
        }
    }

    fn paper(n: u32) -> Paper {
        Paper::new(
            format!("Paper {}", n),
            format!("Abstract of paper {}", n),
            vec![format!("Author {}", n)],
            format!("http://arxiv.org/abs/{}", n),
        )
    }

    fn workspace() -> (Arc<MockStore>, Workspace) {
        let store = Arc::new(MockStore::default());
        let ws = Workspace::new(store.clone());
        (store, ws)
    }

    #[tokio::test]
    async fn test_load_initial_unauthenticated_finishes_immediately() {
        let (store, mut ws) = workspace();
        assert!(ws.is_loading());

        ws.load_initial(false).await;

        assert!(!ws.is_loading());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_load_initial_populates_all_slices() {
        let (store, mut ws) = workspace();
        store.library.lock().unwrap().push(paper(1));
        store.history.lock().unwrap().push(paper(2));
        store.recent.lock().unwrap().push(paper(3));

        ws.load_initial(true).await;

        assert!(!ws.is_loading());
        assert_eq!(ws.saved_papers(), &[paper(1)]);
        assert_eq!(ws.history_papers(), &[paper(2)]);
        assert_eq!(ws.recently_viewed(), &[paper(3)]);
    }

    #[tokio::test]
    async fn test_load_initial_partial_failure_keeps_prior_state() {
        let (store, mut ws) = workspace();
        store.fail_fetches.store(true, Ordering::SeqCst);

        ws.load_initial(true).await;

        assert!(!ws.is_loading());
        assert!(ws.saved_papers().is_empty());
        assert!(ws.history_papers().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_library_appears_immediately_and_persists() {
        let (store, mut ws) = workspace();

        ws.add_paper_to_library(paper(1)).await;

        assert!(ws.is_paper_in_library(&paper(1).link));
        assert!(!ws.is_saving());
        // Survives a "reload" that re-fetches the library list.
        let mut fresh = Workspace::new(store.clone());
        fresh.load_initial(true).await;
        assert!(fresh.is_paper_in_library(&paper(1).link));
    }

    #[tokio::test]
    async fn test_add_to_library_failure_leaves_state_unchanged() {
        let (store, mut ws) = workspace();
        store.fail_saves.store(true, Ordering::SeqCst);

        ws.add_paper_to_library(paper(1)).await;

        assert!(!ws.is_paper_in_library(&paper(1).link));
        // Guard cleared even on failure.
        assert!(!ws.is_saving());
    }

    #[tokio::test]
    async fn test_single_flight_guard_blocks_second_save() {
        let (store, mut ws) = workspace();

        // Simulate a save already in flight.
        ws.saving = true;
        ws.add_paper_to_library(paper(1)).await;
        assert!(store.calls().is_empty());

        // Guard released: the save goes through.
        ws.saving = false;
        ws.add_paper_to_library(paper(1)).await;
        assert_eq!(store.calls(), vec!["save_to_library:http://arxiv.org/abs/1"]);
    }

    #[tokio::test]
    async fn test_duplicate_add_is_noop() {
        let (store, mut ws) = workspace();

        ws.add_paper_to_library(paper(1)).await;
        ws.add_paper_to_library(paper(1)).await;

        assert_eq!(ws.saved_papers().len(), 1);
        assert_eq!(
            store
                .calls()
                .iter()
                .filter(|c| c.starts_with("save_to_library"))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_optimistic_library_removal_despite_remote_failure() {
        let (store, mut ws) = workspace();
        ws.add_paper_to_library(paper(1)).await;
        store.fail_deletes.store(true, Ordering::SeqCst);

        ws.remove_paper_from_library(&paper(1).link).await;

        // Removed locally even though the remote delete failed.
        assert!(!ws.is_paper_in_library(&paper(1).link));
    }

    #[tokio::test]
    async fn test_recency_move_to_front_without_duplication() {
        let (_, mut ws) = workspace();
        let a = paper(1);
        let b = paper(2);

        ws.set_current_paper(Some(a.clone())).await;
        assert_eq!(ws.recently_viewed(), &[a.clone()]);

        ws.set_current_paper(Some(b.clone())).await;
        assert_eq!(ws.recently_viewed(), &[b.clone(), a.clone()]);

        ws.set_current_paper(Some(a.clone())).await;
        assert_eq!(ws.recently_viewed(), &[a, b]);
    }

    #[tokio::test]
    async fn test_viewing_paper_in_history_does_not_touch_recency() {
        let (store, mut ws) = workspace();
        let p = paper(1);
        ws.history_papers.push(p.clone());

        ws.set_current_paper(Some(p)).await;

        assert!(ws.recently_viewed().is_empty());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_view_persistence_failure_does_not_revert() {
        let (store, mut ws) = workspace();
        store.fail_saves.store(true, Ordering::SeqCst);

        ws.set_current_paper(Some(paper(1))).await;

        assert_eq!(ws.recently_viewed().len(), 1);
    }

    #[tokio::test]
    async fn test_first_user_message_promotes_to_history() {
        let (store, mut ws) = workspace();
        let p = paper(1);
        ws.set_current_paper(Some(p.clone())).await;
        assert_eq!(ws.recently_viewed().len(), 1);

        ws.add_message_to_chat(&p, ChatMessage::user("hello")).await;

        assert_eq!(ws.history_papers(), &[p.clone()]);
        assert!(ws.recently_viewed().is_empty());
        let calls = store.calls();
        assert!(calls.contains(&format!("record_history:{}", p.link)));
        assert!(calls.contains(&format!("delete_recently_viewed:{}", p.link)));
    }

    #[tokio::test]
    async fn test_second_message_does_not_duplicate_history() {
        let (store, mut ws) = workspace();
        let p = paper(1);

        ws.add_message_to_chat(&p, ChatMessage::user("first")).await;
        ws.add_message_to_chat(&p, ChatMessage::user("second")).await;

        assert_eq!(ws.history_papers().len(), 1);
        assert_eq!(
            store
                .calls()
                .iter()
                .filter(|c| c.starts_with("record_history"))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_first_bot_message_does_not_promote() {
        let (_, mut ws) = workspace();
        let p = paper(1);

        ws.add_message_to_chat(&p, ChatMessage::bot("welcome")).await;

        assert!(ws.history_papers().is_empty());
    }

    #[tokio::test]
    async fn test_replace_last_preserves_length() {
        let (_, mut ws) = workspace();
        let p = paper(1);

        ws.add_message_to_chat(&p, ChatMessage::user("question")).await;
        ws.push_pending_reply(&p.link);
        assert_eq!(ws.get_chat_for_paper(&p.link).len(), 2);

        ws.replace_last_chat_message(&p.link, ChatMessage::bot("real answer"));

        let chat = ws.get_chat_for_paper(&p.link);
        assert_eq!(chat.len(), 2);
        assert_eq!(chat[1].content, "real answer");
        assert_eq!(chat[0].content, "question");
    }

    #[tokio::test]
    async fn test_replace_last_on_empty_chat_is_noop() {
        let (_, mut ws) = workspace();

        ws.replace_last_chat_message("http://nowhere", ChatMessage::bot("x"));

        assert!(ws.get_chat_for_paper("http://nowhere").is_empty());
    }

    #[tokio::test]
    async fn test_chat_round_trip_after_state_reset() {
        let (store, mut ws) = workspace();
        let p = paper(1);

        ws.add_message_to_chat(&p, ChatMessage::user("what is attention?"))
            .await;
        ws.add_message_to_chat(&p, ChatMessage::bot("a weighted sum"))
            .await;

        // Fresh workspace on the same store: the reload path.
        let mut fresh = Workspace::new(store);
        fresh.load_chat_for_paper(&p).await;

        let chat = fresh.get_chat_for_paper(&p.link);
        assert_eq!(chat.len(), 2);
        assert_eq!(chat[0].role, ChatRole::User);
        assert_eq!(chat[0].content, "what is attention?");
        assert_eq!(chat[1].role, ChatRole::Bot);
        assert_eq!(chat[1].content, "a weighted sum");
        // And the paper is promoted into history.
        assert_eq!(fresh.history_papers(), &[p]);
    }

    #[tokio::test]
    async fn test_load_chat_skips_when_local_history_exists() {
        let (store, mut ws) = workspace();
        let p = paper(1);

        ws.add_message_to_chat(&p, ChatMessage::user("local edit")).await;
        let calls_before = store.calls().len();

        ws.load_chat_for_paper(&p).await;

        // No fetch_chat issued.
        assert_eq!(store.calls().len(), calls_before);
        assert_eq!(ws.get_chat_for_paper(&p.link).len(), 1);
    }

    #[tokio::test]
    async fn test_load_chat_failure_leaves_state_empty() {
        let (store, mut ws) = workspace();
        store.fail_fetches.store(true, Ordering::SeqCst);

        ws.load_chat_for_paper(&paper(1)).await;

        assert!(ws.get_chat_for_paper(&paper(1).link).is_empty());
        assert!(ws.history_papers().is_empty());
    }

    #[tokio::test]
    async fn test_remove_from_history_clears_conversation() {
        let (store, mut ws) = workspace();
        let p = paper(1);
        ws.add_message_to_chat(&p, ChatMessage::user("hi")).await;

        ws.remove_paper_from_history(&p.link).await;

        assert!(ws.history_papers().is_empty());
        assert!(ws.get_chat_for_paper(&p.link).is_empty());
        assert!(store.calls().contains(&format!("delete_history:{}", p.link)));
    }

    #[tokio::test]
    async fn test_browse_state_survives_without_persistence() {
        let (store, mut ws) = workspace();

        ws.set_browse_query("transformer attention");
        ws.set_browse_papers(vec![paper(1), paper(2)]);
        ws.set_browse_searched(true);

        assert_eq!(ws.browse().query, "transformer attention");
        assert_eq!(ws.browse().papers.len(), 2);
        assert!(ws.browse().searched);
        assert!(store.calls().is_empty());
    }
}
