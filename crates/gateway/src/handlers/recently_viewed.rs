//! Recently-viewed handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::handlers::LinkQuery;
use crate::AppState;
use paperdesk_common::{auth::AuthContext, db::Repository, errors::Result, types::Paper};

/// List the user's recently-viewed papers, most recent first.
pub async fn get_recently_viewed(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Paper>>> {
    let repo = Repository::new(state.db.clone());
    let papers = repo.list_recently_viewed(auth.user_id).await?;
    Ok(Json(papers))
}

/// Record a view. One row per (user, paper); re-viewing refreshes the
/// timestamp instead of inserting a duplicate.
pub async fn record_view(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(paper): Json<Paper>,
) -> Result<StatusCode> {
    let repo = Repository::new(state.db.clone());

    repo.upsert_paper(&paper).await?;
    repo.record_view(auth.user_id, &paper.link).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a paper from the recently-viewed set.
pub async fn remove_recently_viewed(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<LinkQuery>,
) -> Result<StatusCode> {
    let repo = Repository::new(state.db.clone());
    repo.remove_recently_viewed(auth.user_id, &query.link).await?;
    Ok(StatusCode::NO_CONTENT)
}
