//! Request handlers for the gateway

pub mod auth;
pub mod chat;
pub mod chats;
pub mod health;
pub mod history;
pub mod library;
pub mod recently_viewed;
pub mod search;

use serde::Deserialize;

/// Query parameter shared by the link-keyed DELETE and GET routes.
#[derive(Debug, Deserialize)]
pub struct LinkQuery {
    pub link: String,
}
