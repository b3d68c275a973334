//! SeaORM entity models

pub mod chat;
pub mod chat_message;
pub mod library_entry;
pub mod paper;
pub mod recently_viewed;
pub mod user;

pub use chat::{
    ActiveModel as ChatActiveModel, Column as ChatColumn, Entity as ChatEntity, Model as Chat,
};
pub use chat_message::{
    ActiveModel as ChatMessageActiveModel, Column as ChatMessageColumn,
    Entity as ChatMessageEntity, Model as ChatMessageRecord,
};
pub use library_entry::{
    ActiveModel as LibraryEntryActiveModel, Column as LibraryEntryColumn,
    Entity as LibraryEntryEntity, Model as LibraryEntry,
};
pub use paper::{
    ActiveModel as PaperActiveModel, Column as PaperColumn, Entity as PaperEntity,
    Model as PaperRecord,
};
pub use recently_viewed::{
    ActiveModel as RecentlyViewedActiveModel, Column as RecentlyViewedColumn,
    Entity as RecentlyViewedEntity, Model as RecentlyViewedEntry,
};
pub use user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity, Model as User,
};
