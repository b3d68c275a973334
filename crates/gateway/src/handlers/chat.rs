//! Chat handlers
//!
//! Two write paths exist: `POST /v1/chat` is the conversational one
//! (persist the user message, generate a reply, persist it, return it),
//! while `POST /v1/chat/messages` persists a single message verbatim for
//! clients that generate replies elsewhere.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::handlers::LinkQuery;
use crate::AppState;
use paperdesk_common::{
    auth::AuthContext,
    db::Repository,
    errors::{AppError, Result},
    types::{ChatMessage, ChatRole, Paper},
};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub paper: Paper,
    pub message: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub reply: ChatMessage,
}

#[derive(Debug, Deserialize)]
pub struct PersistMessageRequest {
    pub paper: Paper,
    pub message: ChatMessage,
}

/// List the user's conversation for a paper, oldest first.
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<LinkQuery>,
) -> Result<Json<Vec<ChatMessage>>> {
    let repo = Repository::new(state.db.clone());
    let messages = repo.list_messages(auth.user_id, &query.link).await?;
    Ok(Json(messages))
}

/// Ask a question about a paper.
///
/// The user message is persisted before the reply is generated, so a
/// completion failure never loses the question. Reply generation itself
/// cannot fail: the responder substitutes a paper-grounded fallback.
pub async fn ask(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    if request.message.trim().is_empty() {
        return Err(AppError::MissingField {
            field: "message".to_string(),
        });
    }

    let repo = Repository::new(state.db.clone());

    repo.upsert_paper(&request.paper).await?;

    let history = repo.list_messages(auth.user_id, &request.paper.link).await?;

    repo.insert_message(
        auth.user_id,
        &request.paper.link,
        ChatRole::User,
        &request.message,
    )
    .await?;
    counter!("paperdesk_chat_messages_total").increment(1);

    let reply_text = state
        .responder
        .reply(&request.message, &request.paper, &history)
        .await;

    let stored = repo
        .insert_message(auth.user_id, &request.paper.link, ChatRole::Bot, &reply_text)
        .await?;
    counter!("paperdesk_chat_messages_total").increment(1);

    Ok(Json(AskResponse {
        reply: stored.to_message(),
    }))
}

/// Persist a single message verbatim.
pub async fn persist_message(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<PersistMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>)> {
    let repo = Repository::new(state.db.clone());

    repo.upsert_paper(&request.paper).await?;

    let stored = repo
        .insert_message(
            auth.user_id,
            &request.paper.link,
            request.message.role,
            &request.message.content,
        )
        .await?;
    counter!("paperdesk_chat_messages_total").increment(1);

    Ok((StatusCode::CREATED, Json(stored.to_message())))
}
