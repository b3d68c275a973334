//! arXiv search proxy handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::AppState;
use paperdesk_common::{
    errors::{AppError, Result},
    types::Paper,
};

/// Upper bound on results per request; arXiv serves larger pages slowly
/// and the browse view never shows more than this.
const MAX_RESULTS_CAP: usize = 50;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,

    pub max: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    #[serde(default)]
    pub query: String,
}

/// Relevance-ordered search.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Paper>>> {
    let query = validated_query(&params.q)?;
    let max = clamp_max(params.max, state.config.arxiv.max_results);

    let papers = state.arxiv.search(query, max).await?;
    Ok(Json(papers))
}

/// Recency-ordered search backing the browse view.
pub async fn search_arxiv(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<Vec<Paper>>> {
    let query = validated_query(&params.query)?;

    let papers = state
        .arxiv
        .search_recent(query, state.config.arxiv.max_results)
        .await?;
    Ok(Json(papers))
}

fn validated_query(raw: &str) -> Result<&str> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(AppError::MissingField {
            field: "query".to_string(),
        });
    }
    Ok(query)
}

fn clamp_max(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, MAX_RESULTS_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_rejected() {
        assert!(validated_query("").is_err());
        assert!(validated_query("   ").is_err());
    }

    #[test]
    fn test_query_is_trimmed() {
        assert_eq!(validated_query("  transformers  ").unwrap(), "transformers");
    }

    #[test]
    fn test_max_results_clamping() {
        assert_eq!(clamp_max(None, 15), 15);
        assert_eq!(clamp_max(Some(5), 15), 5);
        assert_eq!(clamp_max(Some(0), 15), 1);
        assert_eq!(clamp_max(Some(500), 15), MAX_RESULTS_CAP);
    }
}
