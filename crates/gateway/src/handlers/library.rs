//! Saved-library handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::handlers::LinkQuery;
use crate::AppState;
use paperdesk_common::{auth::AuthContext, db::Repository, errors::Result, types::Paper};

#[derive(Serialize)]
pub struct SaveResponse {
    pub status: &'static str,
}

/// List the user's saved papers, alphabetical by title.
pub async fn get_library(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Paper>>> {
    let repo = Repository::new(state.db.clone());
    let papers = repo.list_library(auth.user_id).await?;
    Ok(Json(papers))
}

/// Save a paper. Saving an already-saved paper succeeds with a 200 so
/// the client's saved indicator settles either way.
pub async fn add_to_library(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(paper): Json<Paper>,
) -> Result<(StatusCode, Json<SaveResponse>)> {
    let repo = Repository::new(state.db.clone());

    repo.upsert_paper(&paper).await?;
    let inserted = repo.add_to_library(auth.user_id, &paper.link).await?;

    if inserted {
        tracing::info!(user_id = %auth.user_id, paper = %paper.link, "Paper saved to library");
        Ok((StatusCode::CREATED, Json(SaveResponse { status: "saved" })))
    } else {
        Ok((
            StatusCode::OK,
            Json(SaveResponse {
                status: "already in library",
            }),
        ))
    }
}

/// Remove a paper from the library. Removing an absent paper is a
/// no-op.
pub async fn remove_from_library(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<LinkQuery>,
) -> Result<StatusCode> {
    let repo = Repository::new(state.db.clone());
    repo.remove_from_library(auth.user_id, &query.link).await?;
    Ok(StatusCode::NO_CONTENT)
}
