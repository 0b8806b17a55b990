use std::collections::HashMap;

use async_trait::async_trait;
use fieldops_core::AppResult;
use tokio::sync::RwLock;

use crate::StorageBackend;

/// Process-local storage backend.
#[derive(Default)]
pub struct InMemoryStorageBackend {
    items: RwLock<HashMap<String, String>>,
}

impl InMemoryStorageBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorageBackend {
    async fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.items
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> AppResult<()> {
        self.items.write().await.remove(key);
        Ok(())
    }
}
