use std::sync::Arc;

use async_trait::async_trait;
use fieldops_application::{PermissionCacheRepository, SessionRepository};
use fieldops_core::{AppError, AppResult, UserSession};
use fieldops_domain::CachedPermissions;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{FileStorageBackend, InMemoryStorageBackend};

/// Storage key holding the signed-in session.
pub const SESSION_STORAGE_KEY: &str = "user";

/// Storage key holding the permission cache.
pub const PERMISSION_CACHE_STORAGE_KEY: &str = "permissions";

/// String key-value backend behind [`DurableStorage`].
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get_item(&self, key: &str) -> AppResult<Option<String>>;

    /// Overwrites the value stored under `key`.
    async fn set_item(&self, key: &str, value: &str) -> AppResult<()>;

    /// Removes `key`; removing a missing key succeeds.
    async fn remove_item(&self, key: &str) -> AppResult<()>;
}

/// Durable local storage holding the session and the permission cache as
/// JSON strings under fixed keys.
#[derive(Clone)]
pub struct DurableStorage {
    backend: Arc<dyn StorageBackend>,
}

impl DurableStorage {
    /// Creates durable storage over any backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Creates storage persisted as JSON files inside `directory`.
    #[must_use]
    pub fn file(directory: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(FileStorageBackend::new(directory)))
    }

    /// Creates process-local storage, mostly for tests and demos.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStorageBackend::new()))
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let Some(raw) = self.backend.get_item(key).await? else {
            return Ok(None);
        };

        serde_json::from_str::<T>(raw.as_str())
            .map(Some)
            .map_err(|error| {
                AppError::Validation(format!("stored value for '{key}' is malformed: {error}"))
            })
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value).map_err(|error| {
            AppError::Internal(format!("failed to encode value for '{key}': {error}"))
        })?;
        self.backend.set_item(key, raw.as_str()).await
    }
}

#[async_trait]
impl SessionRepository for DurableStorage {
    async fn load_session(&self) -> AppResult<Option<UserSession>> {
        self.read_json(SESSION_STORAGE_KEY).await
    }

    async fn save_session(&self, session: &UserSession) -> AppResult<()> {
        self.write_json(SESSION_STORAGE_KEY, session).await
    }

    async fn clear_session(&self) -> AppResult<()> {
        self.backend.remove_item(SESSION_STORAGE_KEY).await
    }
}

#[async_trait]
impl PermissionCacheRepository for DurableStorage {
    async fn load_permissions(&self) -> AppResult<Option<CachedPermissions>> {
        self.read_json(PERMISSION_CACHE_STORAGE_KEY).await
    }

    async fn save_permissions(&self, cached: &CachedPermissions) -> AppResult<()> {
        self.write_json(PERMISSION_CACHE_STORAGE_KEY, cached).await
    }

    async fn clear_permissions(&self) -> AppResult<()> {
        self.backend.remove_item(PERMISSION_CACHE_STORAGE_KEY).await
    }
}
