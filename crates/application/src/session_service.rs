use std::sync::Arc;

use fieldops_core::{AppResult, UserSession};
use fieldops_domain::PermissionState;
use tracing::info;

use crate::{PermissionStore, SessionRepository};

/// Login and logout flows that keep the permission store in step.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    store: Arc<PermissionStore>,
}

impl SessionService {
    /// Creates a session service.
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionRepository>, store: Arc<PermissionStore>) -> Self {
        Self { sessions, store }
    }

    /// Persists a freshly issued session and loads its permissions.
    pub async fn login(&self, session: UserSession) -> AppResult<PermissionState> {
        self.sessions.save_session(&session).await?;
        info!(
            display_name = %session.display_name(),
            role_id = ?session.role_id(),
            "session started"
        );

        Ok(self.store.initialize().await)
    }

    /// Removes the session and the permission cache.
    pub async fn logout(&self) -> AppResult<()> {
        self.sessions.clear_session().await?;
        self.store.clear().await?;
        info!("session ended");
        Ok(())
    }

    /// Returns the persisted session, if any.
    pub async fn current_session(&self) -> AppResult<Option<UserSession>> {
        self.sessions.load_session().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use fieldops_core::{AppResult, RoleId, RoleReference, UserSession};
    use fieldops_domain::{
        CachedPermissions, ConsoleComponent, PermissionAction, PermissionRecord, PermissionStatus,
    };
    use tokio::sync::Mutex;

    use super::SessionService;
    use crate::{PermissionCacheRepository, PermissionSource, PermissionStore, SessionRepository};

    #[derive(Default)]
    struct RolePermissionSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PermissionSource for RolePermissionSource {
        async fn fetch_permissions(
            &self,
            role_id: &RoleId,
            _session: &UserSession,
        ) -> AppResult<Vec<PermissionRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let component = match role_id.as_str() {
                "admin" => "User",
                _ => "On Call",
            };
            Ok(vec![PermissionRecord::new(component, [("read", true)])])
        }
    }

    #[derive(Default)]
    struct MemoryStorage {
        session: Mutex<Option<UserSession>>,
        cached: Mutex<Option<CachedPermissions>>,
    }

    #[async_trait]
    impl SessionRepository for MemoryStorage {
        async fn load_session(&self) -> AppResult<Option<UserSession>> {
            Ok(self.session.lock().await.clone())
        }

        async fn save_session(&self, session: &UserSession) -> AppResult<()> {
            *self.session.lock().await = Some(session.clone());
            Ok(())
        }

        async fn clear_session(&self) -> AppResult<()> {
            *self.session.lock().await = None;
            Ok(())
        }
    }

    #[async_trait]
    impl PermissionCacheRepository for MemoryStorage {
        async fn load_permissions(&self) -> AppResult<Option<CachedPermissions>> {
            Ok(self.cached.lock().await.clone())
        }

        async fn save_permissions(&self, cached: &CachedPermissions) -> AppResult<()> {
            *self.cached.lock().await = Some(cached.clone());
            Ok(())
        }

        async fn clear_permissions(&self) -> AppResult<()> {
            *self.cached.lock().await = None;
            Ok(())
        }
    }

    fn session(role_id: &str) -> UserSession {
        UserSession::new(
            format!("token-{role_id}"),
            "Dana",
            Some(RoleReference {
                id: role_id.to_owned(),
                name: role_id.to_owned(),
            }),
        )
    }

    #[tokio::test]
    async fn relogin_with_new_role_replaces_permissions() {
        let source = Arc::new(RolePermissionSource::default());
        let storage = Arc::new(MemoryStorage::default());
        let store = Arc::new(PermissionStore::new(
            source.clone(),
            storage.clone(),
            storage.clone(),
        ));
        let service = SessionService::new(storage.clone(), store.clone());

        let admin = service.login(session("admin")).await;
        assert!(admin.is_ok_and(|state| {
            state.has_permission(ConsoleComponent::User, PermissionAction::Read)
        }));

        let logout = service.logout().await;
        assert!(logout.is_ok());
        assert!(storage.cached.lock().await.is_none());
        assert_eq!(store.state().status(), PermissionStatus::Uninitialized);

        let technician = service.login(session("technician")).await;
        assert!(technician.is_ok_and(|state| {
            state.has_permission(ConsoleComponent::OnCall, PermissionAction::Read)
                && !state.has_permission(ConsoleComponent::User, PermissionAction::Read)
        }));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn logout_leaves_no_session() {
        let storage = Arc::new(MemoryStorage::default());
        let store = Arc::new(PermissionStore::new(
            Arc::new(RolePermissionSource::default()),
            storage.clone(),
            storage.clone(),
        ));
        let service = SessionService::new(storage.clone(), store.clone());

        let login = service.login(session("admin")).await;
        assert!(login.is_ok());
        let logout = service.logout().await;
        assert!(logout.is_ok());

        let current = service.current_session().await;
        assert!(current.is_ok_and(|session| session.is_none()));

        let state = store.initialize().await;
        assert_eq!(state.status(), PermissionStatus::ReadyOk);
        assert!(!state.has_permission(ConsoleComponent::User, PermissionAction::Read));
    }
}
