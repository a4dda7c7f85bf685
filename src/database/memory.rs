use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::item::{Item, ItemPatch, NewItem};
use crate::database::store::{ItemStore, StoreError};
use crate::types::Category;

/// Process-local store for development and tests. Items live in one
/// insertion-ordered bucket per category and vanish on shutdown.
#[derive(Default)]
pub struct MemoryItemStore {
    buckets: RwLock<HashMap<Category, Vec<Item>>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list(&self, category: Category, owner: &str) -> Result<Vec<Item>, StoreError> {
        let buckets = self.buckets.read().await;
        Ok(buckets
            .get(&category)
            .map(|items| items.iter().filter(|i| i.user_id == owner).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, category: Category, owner: &str, fields: NewItem) -> Result<Item, StoreError> {
        let item = Item::new(owner, fields);
        let mut buckets = self.buckets.write().await;
        buckets.entry(category).or_default().push(item.clone());
        Ok(item)
    }

    async fn update(
        &self,
        category: Category,
        owner: &str,
        id: Uuid,
        patch: ItemPatch,
    ) -> Result<Option<Item>, StoreError> {
        let mut buckets = self.buckets.write().await;
        let Some(item) = buckets
            .get_mut(&category)
            .and_then(|items| items.iter_mut().find(|i| i.id == id && i.user_id == owner))
        else {
            return Ok(None);
        };
        item.apply(patch);
        Ok(Some(item.clone()))
    }

    async fn delete(&self, category: Category, owner: &str, id: Uuid) -> Result<bool, StoreError> {
        let mut buckets = self.buckets.write().await;
        let Some(items) = buckets.get_mut(&category) else {
            return Ok(false);
        };
        let before = items.len();
        items.retain(|i| !(i.id == id && i.user_id == owner));
        Ok(items.len() < before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
