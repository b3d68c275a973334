//! Paper entity
//!
//! The primary key is the paper's canonical link, matching the identity
//! rule used everywhere else in the system.

use crate::types::Paper;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "papers")]
pub struct Model {
    /// Canonical link, e.g. "http://arxiv.org/abs/1706.03762v7"
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub summary: String,

    /// Ordered author names as a JSONB array
    #[sea_orm(column_type = "JsonBinary")]
    pub authors: Json,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::chat_message::Entity")]
    ChatMessages,

    #[sea_orm(has_many = "super::library_entry::Entity")]
    LibraryEntries,

    #[sea_orm(has_many = "super::recently_viewed::Entity")]
    RecentlyViewed,
}

impl Related<super::chat_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChatMessages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert the stored row into the wire-level Paper DTO.
    pub fn to_paper(&self) -> Paper {
        let authors = self
            .authors
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Paper {
            title: self.title.clone(),
            summary: self.summary.clone(),
            authors,
            link: self.id.clone(),
        }
    }
}
