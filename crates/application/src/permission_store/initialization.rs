use fieldops_core::{AppResult, UserSession};
use fieldops_domain::PermissionSet;
use tracing::{debug, info, warn};

use super::*;

impl PermissionStore {
    /// Runs one initialization and returns the role it ran for.
    pub(super) async fn run(&self, policy: CachePolicy) -> Option<RoleId> {
        let session = self.load_session().await;
        let Some((session, role_id)) = session.and_then(|session| {
            let role_id = session.role_id()?;
            Some((session, role_id))
        }) else {
            info!("no signed-in role, permissions are empty");
            self.publish(PermissionState::ready(PermissionSet::empty()));
            return None;
        };

        if policy == CachePolicy::PreferCache
            && let Some(permissions) = self.cached_permissions_for(&role_id).await
        {
            info!(
                role_id = %role_id,
                features = permissions.records().len(),
                "adopted cached permissions"
            );
            self.publish(PermissionState::ready(permissions));
            return Some(role_id);
        }

        self.publish(PermissionState::Fetching);
        match self.fetch(&session, &role_id).await {
            Ok(permissions) => {
                if let Some(cached) = permissions.to_cache()
                    && let Err(error) = self.cache.save_permissions(&cached).await
                {
                    warn!(
                        role_id = %role_id,
                        error = %error,
                        "failed to persist permission cache"
                    );
                }

                let unrecognized = permissions.unrecognized_components();
                if !unrecognized.is_empty() {
                    debug!(
                        role_id = %role_id,
                        components = ?unrecognized,
                        "backend sent components outside the console registry"
                    );
                }

                info!(
                    role_id = %role_id,
                    features = permissions.records().len(),
                    "fetched permissions"
                );
                self.publish(PermissionState::ready(permissions));
            }
            Err(error) => {
                warn!(
                    role_id = %role_id,
                    error = %error,
                    "failed to fetch permissions"
                );
                self.publish(PermissionState::Failed(error));
            }
        }

        Some(role_id)
    }

    pub(super) async fn session_role_id(&self) -> Option<RoleId> {
        self.load_session()
            .await
            .and_then(|session| session.role_id())
    }

    async fn load_session(&self) -> Option<UserSession> {
        match self.sessions.load_session().await {
            Ok(session) => session,
            Err(error) => {
                warn!(error = %error, "failed to read persisted session");
                None
            }
        }
    }

    async fn cached_permissions_for(&self, role_id: &RoleId) -> Option<PermissionSet> {
        let cached = match self.cache.load_permissions().await {
            Ok(Some(cached)) => cached,
            Ok(None) => return None,
            Err(error) => {
                warn!(error = %error, "ignoring unreadable permission cache");
                return None;
            }
        };

        if &cached.role_id != role_id {
            debug!(
                cached_role_id = %cached.role_id,
                role_id = %role_id,
                "permission cache belongs to another role"
            );
            return None;
        }

        match PermissionSet::from_cache(cached) {
            Ok(permissions) => Some(permissions),
            Err(error) => {
                warn!(error = %error, "ignoring invalid permission cache");
                None
            }
        }
    }

    async fn fetch(&self, session: &UserSession, role_id: &RoleId) -> AppResult<PermissionSet> {
        let records = self.source.fetch_permissions(role_id, session).await?;
        PermissionSet::new(role_id.clone(), records)
    }
}
