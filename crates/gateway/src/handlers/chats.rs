//! Named-chat resource handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use paperdesk_common::{
    auth::AuthContext,
    db::models::Chat,
    db::Repository,
    errors::{AppError, Result},
    types::{ChatMessage, Paper},
};

#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    pub paper: Paper,

    /// Defaults to the paper title.
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMessageRequest {
    pub message: ChatMessage,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub id: Uuid,
    pub paper_link: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ChatResponse {
    fn from_model(chat: Chat) -> Self {
        Self {
            id: chat.id,
            paper_link: chat.paper_id,
            title: chat.title,
            created_at: chat.created_at.to_rfc3339(),
            updated_at: chat.updated_at.to_rfc3339(),
        }
    }
}

/// List the user's chats, most recently active first.
pub async fn list_chats(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<ChatResponse>>> {
    let repo = Repository::new(state.db.clone());
    let chats = repo.list_chats(auth.user_id).await?;
    Ok(Json(chats.into_iter().map(ChatResponse::from_model).collect()))
}

/// Create a chat for a paper.
pub async fn create_chat(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>)> {
    let repo = Repository::new(state.db.clone());

    repo.upsert_paper(&request.paper).await?;

    let title = request
        .title
        .unwrap_or_else(|| request.paper.title.clone());
    let chat = repo.create_chat(auth.user_id, &request.paper.link, title).await?;

    tracing::info!(user_id = %auth.user_id, chat_id = %chat.id, "Chat created");

    Ok((StatusCode::CREATED, Json(ChatResponse::from_model(chat))))
}

/// Get a chat by id. Another user's chat is indistinguishable from a
/// missing one.
pub async fn get_chat(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatResponse>> {
    let repo = Repository::new(state.db.clone());
    let chat = find_owned_chat(&repo, auth.user_id, id).await?;
    Ok(Json(ChatResponse::from_model(chat)))
}

/// Delete a chat. The underlying conversation messages are keyed by
/// paper and survive; only the named handle goes away.
pub async fn delete_chat(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let repo = Repository::new(state.db.clone());
    find_owned_chat(&repo, auth.user_id, id).await?;
    repo.delete_chat(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the conversation behind a chat, oldest first.
pub async fn get_chat_messages(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>> {
    let repo = Repository::new(state.db.clone());
    let chat = find_owned_chat(&repo, auth.user_id, id).await?;
    let messages = repo.list_messages(auth.user_id, &chat.paper_id).await?;
    Ok(Json(messages))
}

/// Append a message to a chat's conversation and bump its activity
/// timestamp.
pub async fn add_chat_message(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(request): Json<AddMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>)> {
    let repo = Repository::new(state.db.clone());
    let chat = find_owned_chat(&repo, auth.user_id, id).await?;

    let stored = repo
        .insert_message(
            auth.user_id,
            &chat.paper_id,
            request.message.role,
            &request.message.content,
        )
        .await?;
    counter!("paperdesk_chat_messages_total").increment(1);

    repo.touch_chat(id).await?;

    Ok((StatusCode::CREATED, Json(stored.to_message())))
}

async fn find_owned_chat(repo: &Repository, user_id: Uuid, id: Uuid) -> Result<Chat> {
    let chat = repo
        .find_chat(id)
        .await?
        .ok_or_else(|| AppError::ChatNotFound { id: id.to_string() })?;

    if chat.user_id != user_id {
        return Err(AppError::ChatNotFound { id: id.to_string() });
    }

    Ok(chat)
}
