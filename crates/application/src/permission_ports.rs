use async_trait::async_trait;
use fieldops_core::{AppResult, RoleId, UserSession};
use fieldops_domain::{CachedPermissions, PermissionRecord};

/// Backend port returning the feature permissions of one role.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Fetches the permission records for a role.
    ///
    /// Transport failures, non-success statuses and malformed payloads are
    /// all reported as errors.
    async fn fetch_permissions(
        &self,
        role_id: &RoleId,
        session: &UserSession,
    ) -> AppResult<Vec<PermissionRecord>>;
}

/// Durable storage port for the signed-in session.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads the persisted session, if any.
    async fn load_session(&self) -> AppResult<Option<UserSession>>;

    /// Persists the session created at login.
    async fn save_session(&self, session: &UserSession) -> AppResult<()>;

    /// Removes the persisted session.
    async fn clear_session(&self) -> AppResult<()>;
}

/// Durable storage port for the permission cache.
///
/// Only the permission store writes through this port.
#[async_trait]
pub trait PermissionCacheRepository: Send + Sync {
    /// Loads the cached permission record, if any.
    async fn load_permissions(&self) -> AppResult<Option<CachedPermissions>>;

    /// Overwrites the cached permission record.
    async fn save_permissions(&self, cached: &CachedPermissions) -> AppResult<()>;

    /// Removes the cached permission record.
    async fn clear_permissions(&self) -> AppResult<()>;
}
