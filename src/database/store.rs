use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::item::{Item, ItemPatch, NewItem};
use crate::types::Category;

/// Errors from an item store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Storage behind the category registry. Every call names its category;
/// owner-scoped calls only ever see rows whose `user_id` equals `owner`.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items in `category` owned by `owner`, oldest first
    async fn list(&self, category: Category, owner: &str) -> Result<Vec<Item>, StoreError>;

    async fn insert(&self, category: Category, owner: &str, fields: NewItem) -> Result<Item, StoreError>;

    /// Returns `None` when the item is absent or owned by someone else
    async fn update(
        &self,
        category: Category,
        owner: &str,
        id: Uuid,
        patch: ItemPatch,
    ) -> Result<Option<Item>, StoreError>;

    /// Returns `false` when the item is absent or owned by someone else
    async fn delete(&self, category: Category, owner: &str, id: Uuid) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
