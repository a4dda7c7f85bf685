//! Category registry: one handle per category, all backed by the same store.

use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::item::{Item, ItemPatch, NewItem};
use crate::database::store::{ItemStore, StoreError};
use crate::types::Category;

/// Built once at startup and shared through application state
#[derive(Clone)]
pub struct CategoryRegistry {
    store: Arc<dyn ItemStore>,
}

impl CategoryRegistry {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Handle on the storage namespace for `category`. Repeated calls for the
    /// same category address the same namespace.
    pub fn handle(&self, category: Category) -> CategoryHandle {
        CategoryHandle {
            category,
            store: Arc::clone(&self.store),
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}

/// Owner-scoped operations on one category
#[derive(Clone)]
pub struct CategoryHandle {
    category: Category,
    store: Arc<dyn ItemStore>,
}

impl CategoryHandle {
    pub fn category(&self) -> Category {
        self.category
    }

    pub async fn list(&self, owner: &str) -> Result<Vec<Item>, StoreError> {
        self.store.list(self.category, owner).await
    }

    pub async fn create(&self, owner: &str, fields: NewItem) -> Result<Item, StoreError> {
        self.store.insert(self.category, owner, fields).await
    }

    pub async fn update(&self, owner: &str, id: Uuid, patch: ItemPatch) -> Result<Option<Item>, StoreError> {
        self.store.update(self.category, owner, id, patch).await
    }

    pub async fn delete(&self, owner: &str, id: Uuid) -> Result<bool, StoreError> {
        self.store.delete(self.category, owner, id).await
    }
}
