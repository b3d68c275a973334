//! Chat-history list handlers
//!
//! The history list is derived: a paper is "in history" exactly when the
//! user has chat messages for it. POST therefore only upserts the paper
//! record (so the messages have a row to reference), and DELETE removes
//! the messages themselves.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::handlers::LinkQuery;
use crate::AppState;
use paperdesk_common::{auth::AuthContext, db::Repository, errors::Result, types::Paper};

/// List the papers the user has chatted with, latest conversation first.
pub async fn get_history(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Paper>>> {
    let repo = Repository::new(state.db.clone());
    let papers = repo.list_history_papers(auth.user_id).await?;
    Ok(Json(papers))
}

/// Persist the paper record backing a history entry.
pub async fn record_history(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(paper): Json<Paper>,
) -> Result<StatusCode> {
    let repo = Repository::new(state.db.clone());
    repo.upsert_paper(&paper).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete the user's conversation for a paper, which drops it from the
/// derived history list.
pub async fn remove_history(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<LinkQuery>,
) -> Result<StatusCode> {
    let repo = Repository::new(state.db.clone());
    repo.delete_history(auth.user_id, &query.link).await?;

    tracing::info!(user_id = %auth.user_id, paper = %query.link, "Chat history deleted");

    Ok(StatusCode::NO_CONTENT)
}
