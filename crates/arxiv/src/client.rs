//! HTTP client for the arXiv query API.

use crate::parse::parse_atom_feed;
use metrics::counter;
use paperdesk_common::config::ArxivConfig;
use paperdesk_common::errors::{AppError, Result};
use paperdesk_common::types::Paper;
use std::time::Duration;

/// Sort criteria accepted by the query API.
#[derive(Debug, Clone, Copy)]
pub enum SortBy {
    Relevance,
    SubmittedDate,
}

impl SortBy {
    fn as_api_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::SubmittedDate => "submittedDate",
        }
    }
}

/// arXiv lookup client.
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    pub fn new(config: &ArxivConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to build arXiv HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Search by relevance, most relevant first.
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Paper>> {
        self.query(query, max_results, SortBy::Relevance).await
    }

    /// Search by submission date, most recent first. Used by the browse
    /// proxy.
    pub async fn search_recent(&self, query: &str, max_results: usize) -> Result<Vec<Paper>> {
        self.query(query, max_results, SortBy::SubmittedDate).await
    }

    /// Fetch a single paper by its arXiv id (e.g. "1706.03762").
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Paper>> {
        let papers = self.query(&format!("id:{}", id), 1, SortBy::Relevance).await?;
        Ok(papers.into_iter().next())
    }

    async fn query(&self, query: &str, max_results: usize, sort_by: SortBy) -> Result<Vec<Paper>> {
        let url = self.build_url(query, max_results, sort_by);

        counter!("paperdesk_search_queries_total").increment(1);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::SearchUpstream {
                message: format!("arXiv request failed: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(AppError::SearchUpstream {
                message: format!("arXiv API responded with status {}", response.status()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::SearchUpstream {
                message: format!("Failed to read arXiv response: {}", e),
            })?;

        let papers = parse_atom_feed(&body);

        tracing::debug!(
            query = %query,
            results = papers.len(),
            sort = sort_by.as_api_str(),
            "arXiv search completed"
        );

        Ok(papers)
    }

    fn build_url(&self, query: &str, max_results: usize, sort_by: SortBy) -> String {
        format!(
            "{}?search_query=all:{}&start=0&max_results={}&sortBy={}&sortOrder=descending",
            self.base_url,
            urlencoding::encode(query),
            max_results,
            sort_by.as_api_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperdesk_common::config::ArxivConfig;

    fn test_config() -> ArxivConfig {
        ArxivConfig {
            base_url: "http://export.arxiv.org/api/query".to_string(),
            max_results: 15,
            timeout_secs: 20,
        }
    }

    #[test]
    fn test_build_url_encodes_query() {
        let client = ArxivClient::new(&test_config()).unwrap();
        let url = client.build_url("transformer attention", 5, SortBy::Relevance);
        assert!(url.contains("search_query=all:transformer%20attention"));
        assert!(url.contains("max_results=5"));
        assert!(url.contains("sortBy=relevance"));
    }

    #[test]
    fn test_build_url_recent_sort() {
        let client = ArxivClient::new(&test_config()).unwrap();
        let url = client.build_url("llm", 15, SortBy::SubmittedDate);
        assert!(url.contains("sortBy=submittedDate"));
        assert!(url.contains("sortOrder=descending"));
    }
}
