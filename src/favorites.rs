use std::sync::Arc;

use crate::favorites_store::FavoritesStore;
use crate::model::{CatalogItem, FavoritesCollection};

/// In-memory mirror of the favorites record.
///
/// Every mutation rewrites the whole record before returning. When the write
/// fails the mirror stays as mutated, so reads within the session always see
/// their own writes.
pub struct FavoritesManager {
    store: Arc<dyn FavoritesStore>,
    items: FavoritesCollection,
}

impl FavoritesManager {
    /// Starts empty; call [`FavoritesManager::reload`] to read the store.
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        Self {
            store,
            items: Vec::new(),
        }
    }

    pub async fn open(store: Arc<dyn FavoritesStore>) -> Self {
        let mut manager = Self::new(store);
        manager.reload().await;
        manager
    }

    pub async fn reload(&mut self) {
        self.items = self.store.load().await;
        tracing::debug!(count = self.items.len(), "loaded favorites");
    }

    pub fn list(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_favorite(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.key == key)
    }

    /// Returns `false` without touching the store when the key is already saved.
    pub async fn add(&mut self, item: CatalogItem) -> bool {
        if self.is_favorite(&item.key) {
            tracing::debug!(key = %item.key, "already a favorite");
            return false;
        }
        tracing::info!(key = %item.key, title = %item.title, "adding favorite");
        self.items.push(item);
        self.persist().await;
        true
    }

    /// Returns `false` without touching the store when the key is absent.
    pub async fn remove(&mut self, key: &str) -> bool {
        let Some(index) = self.items.iter().position(|item| item.key == key) else {
            tracing::debug!(key, "not a favorite");
            return false;
        };
        tracing::info!(key, "removing favorite");
        self.items.remove(index);
        self.persist().await;
        true
    }

    async fn persist(&self) {
        if let Err(err) = self.store.save(&self.items).await {
            tracing::warn!(
                count = self.items.len(),
                ?err,
                "could not persist favorites; keeping in-memory state"
            );
        }
    }
}
