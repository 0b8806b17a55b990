use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use fieldops_core::{AppResult, RoleId};
use fieldops_domain::{ConsoleComponent, PermissionAction, PermissionState};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info};

use crate::{PermissionCacheRepository, PermissionSource, SessionRepository};

mod initialization;


/// Whether an initialization run may adopt the durable cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CachePolicy {
    PreferCache,
    BypassCache,
}

#[derive(Debug, Default)]
struct InitializationRecord {
    /// Last `initialize` run whose outcome is still published.
    shared: Option<SharedRun>,
}

#[derive(Debug)]
struct SharedRun {
    role_id: Option<RoleId>,
}

/// Single source of truth for the signed-in user's feature permissions.
///
/// The store owns the durable permission cache and publishes every state
/// transition through a watch channel. Concurrent [`PermissionStore::initialize`]
/// calls share one in-flight run.
pub struct PermissionStore {
    source: Arc<dyn PermissionSource>,
    sessions: Arc<dyn SessionRepository>,
    cache: Arc<dyn PermissionCacheRepository>,
    state: watch::Sender<PermissionState>,
    initialization: Mutex<InitializationRecord>,
    completed_runs: AtomicU64,
}

impl PermissionStore {
    /// Creates an uninitialized store from its ports.
    #[must_use]
    pub fn new(
        source: Arc<dyn PermissionSource>,
        sessions: Arc<dyn SessionRepository>,
        cache: Arc<dyn PermissionCacheRepository>,
    ) -> Self {
        let (state, _) = watch::channel(PermissionState::Uninitialized);

        Self {
            source,
            sessions,
            cache,
            state,
            initialization: Mutex::new(InitializationRecord::default()),
            completed_runs: AtomicU64::new(0),
        }
    }

    /// Loads permissions for the persisted session.
    ///
    /// Adopts the durable cache when it belongs to the session's role and
    /// otherwise fetches once from the backend. A caller that queues behind
    /// an in-flight `initialize` for the same role adopts that run's outcome,
    /// unless a `refresh` or `clear` replaced it in the meantime.
    pub async fn initialize(&self) -> PermissionState {
        let observed_runs = self.completed_runs.load(Ordering::Acquire);
        let mut record = self.initialization.lock().await;

        if self.completed_runs.load(Ordering::Acquire) != observed_runs
            && let Some(shared) = record.shared.as_ref()
            && self.state().is_ready()
        {
            let session_role_id = self.session_role_id().await;
            if session_role_id == shared.role_id {
                debug!(
                    role_id = ?session_role_id,
                    "joined in-flight permission initialization"
                );
                return self.state();
            }
        }

        let role_id = self.run(CachePolicy::PreferCache).await;
        record.shared = Some(SharedRun { role_id });
        self.completed_runs.fetch_add(1, Ordering::AcqRel);
        self.state()
    }

    /// Fetches permissions again without consulting the durable cache.
    pub async fn refresh(&self) -> PermissionState {
        let mut record = self.initialization.lock().await;
        self.run(CachePolicy::BypassCache).await;
        record.shared = None;
        self.completed_runs.fetch_add(1, Ordering::AcqRel);
        self.state()
    }

    /// Drops the durable cache and returns to the uninitialized state.
    pub async fn clear(&self) -> AppResult<()> {
        let mut record = self.initialization.lock().await;
        self.cache.clear_permissions().await?;
        record.shared = None;
        self.publish(PermissionState::Uninitialized);
        info!("permission cache cleared");
        Ok(())
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> PermissionState {
        self.state.borrow().clone()
    }

    /// Subscribes to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PermissionState> {
        self.state.subscribe()
    }

    /// Returns whether the current user may perform `action` on `component`.
    #[must_use]
    pub fn has_permission(&self, component: ConsoleComponent, action: PermissionAction) -> bool {
        self.state.borrow().has_permission(component, action)
    }

    fn publish(&self, state: PermissionState) {
        debug!(status = state.status().as_str(), "permission state changed");
        self.state.send_replace(state);
    }
}
