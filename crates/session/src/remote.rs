//! HTTP-backed PaperStore targeting the gateway API.

use crate::store::PaperStore;
use async_trait::async_trait;
use paperdesk_common::errors::{AppError, Result};
use paperdesk_common::types::{ChatMessage, Paper};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct PersistMessageRequest<'a> {
    paper: &'a Paper,
    message: &'a ChatMessage,
}

/// PaperStore implementation speaking to the gateway with a bearer
/// token.
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to build store HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        Self::check_status(path, &response)?;
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        Self::check_status(path, &response)
    }

    async fn delete(&self, path: &str, link: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(path))
            .bearer_auth(&self.token)
            .query(&[("link", link)])
            .send()
            .await?;

        Self::check_status(path, &response)
    }

    fn check_status(path: &str, response: &reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::Internal {
                message: format!("{} responded with status {}", path, response.status()),
            })
        }
    }
}

#[async_trait]
impl PaperStore for RemoteStore {
    async fn fetch_library(&self) -> Result<Vec<Paper>> {
        self.get_json("/v1/library", &[]).await
    }

    async fn fetch_history(&self) -> Result<Vec<Paper>> {
        self.get_json("/v1/history", &[]).await
    }

    async fn fetch_recently_viewed(&self) -> Result<Vec<Paper>> {
        self.get_json("/v1/recently-viewed", &[]).await
    }

    async fn save_to_library(&self, paper: &Paper) -> Result<()> {
        self.post_json("/v1/library", paper).await
    }

    async fn delete_from_library(&self, link: &str) -> Result<()> {
        self.delete("/v1/library", link).await
    }

    async fn record_view(&self, paper: &Paper) -> Result<()> {
        self.post_json("/v1/recently-viewed", paper).await
    }

    async fn delete_recently_viewed(&self, link: &str) -> Result<()> {
        self.delete("/v1/recently-viewed", link).await
    }

    async fn record_history(&self, paper: &Paper) -> Result<()> {
        self.post_json("/v1/history", paper).await
    }

    async fn delete_history(&self, link: &str) -> Result<()> {
        self.delete("/v1/history", link).await
    }

    async fn persist_message(&self, paper: &Paper, message: &ChatMessage) -> Result<()> {
        self.post_json("/v1/chat/messages", &PersistMessageRequest { paper, message })
            .await
    }

    async fn fetch_chat(&self, link: &str) -> Result<Vec<ChatMessage>> {
        self.get_json("/v1/chat", &[("link", link)]).await
    }
}
