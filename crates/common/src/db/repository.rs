//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations. Duplicate
//! inserts on the association tables are absorbed here (ON CONFLICT) so
//! callers can treat "already saved" as success, which is the policy the
//! rest of the system relies on.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::Result;
use crate::types::{ChatMessage, ChatRole, Paper};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    QueryOrder, Set, Statement,
};
use uuid::Uuid;

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // User Operations
    // ========================================================================

    /// Create a new user with an already-hashed password
    pub async fn create_user(
        &self,
        email: String,
        name: String,
        password_hash: String,
    ) -> Result<User> {
        let now = chrono::Utc::now();

        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            name: Set(name),
            password_hash: Set(password_hash),
            created_at: Set(now.into()),
        };

        user.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find a user by email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Paper Operations
    // ========================================================================

    /// Insert or refresh a paper row, keyed by its link
    pub async fn upsert_paper(&self, paper: &Paper) -> Result<()> {
        let now = chrono::Utc::now();

        let model = PaperActiveModel {
            id: Set(paper.link.clone()),
            title: Set(paper.title.clone()),
            summary: Set(paper.summary.clone()),
            authors: Set(serde_json::to_value(&paper.authors)?),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        PaperEntity::insert(model)
            .on_conflict(
                OnConflict::column(PaperColumn::Id)
                    .update_columns([
                        PaperColumn::Title,
                        PaperColumn::Summary,
                        PaperColumn::Authors,
                        PaperColumn::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.write_conn())
            .await?;

        Ok(())
    }

    /// Find a paper by link
    pub async fn find_paper(&self, link: &str) -> Result<Option<PaperRecord>> {
        PaperEntity::find_by_id(link)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Library Operations
    // ========================================================================

    /// List the user's library, sorted by paper title
    pub async fn list_library(&self, user_id: Uuid) -> Result<Vec<Paper>> {
        let rows = PaperEntity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"SELECT p.* FROM papers p
                   JOIN library_entries l ON l.paper_id = p.id
                   WHERE l.user_id = $1
                   ORDER BY p.title ASC"#,
                [user_id.into()],
            ))
            .all(self.read_conn())
            .await?;

        Ok(rows.iter().map(PaperRecord::to_paper).collect())
    }

    /// Add a paper to the user's library.
    ///
    /// Returns false when the pair already existed; a duplicate save is
    /// not an error.
    pub async fn add_to_library(&self, user_id: Uuid, link: &str) -> Result<bool> {
        let now = chrono::Utc::now();

        let model = LibraryEntryActiveModel {
            user_id: Set(user_id),
            paper_id: Set(link.to_string()),
            added_at: Set(now.into()),
        };

        let inserted = LibraryEntryEntity::insert(model)
            .on_conflict(
                OnConflict::columns([LibraryEntryColumn::UserId, LibraryEntryColumn::PaperId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.write_conn())
            .await?;

        Ok(inserted > 0)
    }

    /// Remove a paper from the user's library
    pub async fn remove_from_library(&self, user_id: Uuid, link: &str) -> Result<()> {
        LibraryEntryEntity::delete_many()
            .filter(LibraryEntryColumn::UserId.eq(user_id))
            .filter(LibraryEntryColumn::PaperId.eq(link))
            .exec(self.write_conn())
            .await?;

        Ok(())
    }

    // ========================================================================
    // Recently-Viewed Operations
    // ========================================================================

    /// List the user's recently-viewed papers, most recent first
    pub async fn list_recently_viewed(&self, user_id: Uuid) -> Result<Vec<Paper>> {
        let rows = PaperEntity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"SELECT p.* FROM papers p
                   JOIN recently_viewed r ON r.paper_id = p.id
                   WHERE r.user_id = $1
                   ORDER BY r.viewed_at DESC"#,
                [user_id.into()],
            ))
            .all(self.read_conn())
            .await?;

        Ok(rows.iter().map(PaperRecord::to_paper).collect())
    }

    /// Record a view: one row per (user, paper), timestamp refreshed on
    /// re-view
    pub async fn record_view(&self, user_id: Uuid, link: &str) -> Result<()> {
        let now = chrono::Utc::now();

        let model = RecentlyViewedActiveModel {
            user_id: Set(user_id),
            paper_id: Set(link.to_string()),
            viewed_at: Set(now.into()),
        };

        RecentlyViewedEntity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    RecentlyViewedColumn::UserId,
                    RecentlyViewedColumn::PaperId,
                ])
                .update_column(RecentlyViewedColumn::ViewedAt)
                .to_owned(),
            )
            .exec_without_returning(self.write_conn())
            .await?;

        Ok(())
    }

    /// Remove a paper from the user's recently-viewed set
    pub async fn remove_recently_viewed(&self, user_id: Uuid, link: &str) -> Result<()> {
        RecentlyViewedEntity::delete_many()
            .filter(RecentlyViewedColumn::UserId.eq(user_id))
            .filter(RecentlyViewedColumn::PaperId.eq(link))
            .exec(self.write_conn())
            .await?;

        Ok(())
    }

    // ========================================================================
    // Chat History Operations
    // ========================================================================

    /// List the papers the user has chatted with, ordered by the time of
    /// their latest message. Derived from chat_messages; there is no
    /// separate history table.
    pub async fn list_history_papers(&self, user_id: Uuid) -> Result<Vec<Paper>> {
        let rows = PaperEntity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DbBackend::Postgres,
                r#"SELECT p.* FROM papers p
                   JOIN (
                       SELECT paper_id, MAX(created_at) AS last_message_at
                       FROM chat_messages
                       WHERE user_id = $1
                       GROUP BY paper_id
                   ) m ON m.paper_id = p.id
                   ORDER BY m.last_message_at DESC"#,
                [user_id.into()],
            ))
            .all(self.read_conn())
            .await?;

        Ok(rows.iter().map(PaperRecord::to_paper).collect())
    }

    /// Delete the user's chat history for a paper. This is what removes
    /// the paper from the derived history list.
    pub async fn delete_history(&self, user_id: Uuid, link: &str) -> Result<()> {
        ChatMessageEntity::delete_many()
            .filter(ChatMessageColumn::UserId.eq(user_id))
            .filter(ChatMessageColumn::PaperId.eq(link))
            .exec(self.write_conn())
            .await?;

        Ok(())
    }

    /// Persist a chat message; created_at is assigned here
    pub async fn insert_message(
        &self,
        user_id: Uuid,
        link: &str,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessageRecord> {
        let now = chrono::Utc::now();

        let model = ChatMessageActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            paper_id: Set(link.to_string()),
            role: Set(role.as_str().to_string()),
            content: Set(content.to_string()),
            created_at: Set(now.into()),
        };

        model.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// List the user's messages for a paper in conversation order
    pub async fn list_messages(&self, user_id: Uuid, link: &str) -> Result<Vec<ChatMessage>> {
        let rows = ChatMessageEntity::find()
            .filter(ChatMessageColumn::UserId.eq(user_id))
            .filter(ChatMessageColumn::PaperId.eq(link))
            .order_by_asc(ChatMessageColumn::CreatedAt)
            .all(self.read_conn())
            .await?;

        Ok(rows.iter().map(ChatMessageRecord::to_message).collect())
    }

    // ========================================================================
    // Chats Resource Operations
    // ========================================================================

    /// Create a named chat for a paper
    pub async fn create_chat(&self, user_id: Uuid, link: &str, title: String) -> Result<Chat> {
        let now = chrono::Utc::now();

        let chat = ChatActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            paper_id: Set(link.to_string()),
            title: Set(title),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        chat.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// List the user's chats, most recently updated first
    pub async fn list_chats(&self, user_id: Uuid) -> Result<Vec<Chat>> {
        ChatEntity::find()
            .filter(ChatColumn::UserId.eq(user_id))
            .order_by_desc(ChatColumn::UpdatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find a chat by id
    pub async fn find_chat(&self, id: Uuid) -> Result<Option<Chat>> {
        ChatEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Delete a chat
    pub async fn delete_chat(&self, id: Uuid) -> Result<()> {
        ChatEntity::delete_by_id(id)
            .exec(self.write_conn())
            .await?;

        Ok(())
    }

    /// Bump a chat's updated_at after new activity
    pub async fn touch_chat(&self, id: Uuid) -> Result<()> {
        let now = chrono::Utc::now();

        let chat = ChatActiveModel {
            id: Set(id),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        chat.update(self.write_conn()).await?;

        Ok(())
    }
}
