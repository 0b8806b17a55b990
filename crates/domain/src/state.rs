use std::sync::Arc;

use fieldops_core::AppError;

use crate::{ConsoleComponent, PermissionAction, PermissionSet};

/// Lifecycle status of the permission store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionStatus {
    /// No initialization has run yet.
    Uninitialized,
    /// A fetch is in flight.
    Fetching,
    /// Permissions are loaded (possibly empty).
    ReadyOk,
    /// The last fetch failed; no permissions are held.
    ReadyError,
}

impl PermissionStatus {
    /// Returns a stable label for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Fetching => "fetching",
            Self::ReadyOk => "ready_ok",
            Self::ReadyError => "ready_error",
        }
    }
}

/// Readiness signal consumed by gates and guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Readiness {
    /// Fetch not started or still in flight.
    NotReady,
    /// Permissions available.
    ReadyWithData,
    /// Permissions could not be loaded.
    ReadyWithError,
}

/// Snapshot of the permission store.
#[derive(Debug, Clone, Default)]
pub enum PermissionState {
    /// No initialization has run yet.
    #[default]
    Uninitialized,
    /// A fetch is in flight.
    Fetching,
    /// Permissions are loaded.
    Ready(Arc<PermissionSet>),
    /// The last fetch failed.
    Failed(AppError),
}

impl PermissionState {
    /// Creates a ready state holding the given set.
    #[must_use]
    pub fn ready(permissions: PermissionSet) -> Self {
        Self::Ready(Arc::new(permissions))
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> PermissionStatus {
        match self {
            Self::Uninitialized => PermissionStatus::Uninitialized,
            Self::Fetching => PermissionStatus::Fetching,
            Self::Ready(_) => PermissionStatus::ReadyOk,
            Self::Failed(_) => PermissionStatus::ReadyError,
        }
    }

    /// Returns the derived readiness signal.
    #[must_use]
    pub fn readiness(&self) -> Readiness {
        match self {
            Self::Uninitialized | Self::Fetching => Readiness::NotReady,
            Self::Ready(_) => Readiness::ReadyWithData,
            Self::Failed(_) => Readiness::ReadyWithError,
        }
    }

    /// Returns whether a decision can be made (success or failure).
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.readiness() != Readiness::NotReady
    }

    /// Returns the loaded set when ready with data.
    #[must_use]
    pub fn permissions(&self) -> Option<&PermissionSet> {
        match self {
            Self::Ready(permissions) => Some(permissions.as_ref()),
            _ => None,
        }
    }

    /// Returns the recorded fetch error.
    #[must_use]
    pub fn error(&self) -> Option<&AppError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Returns whether the current user may perform `action` on `component`.
    ///
    /// Denies unless permissions are loaded and the matching record has the
    /// action flag set to `true`.
    #[must_use]
    pub fn has_permission(&self, component: ConsoleComponent, action: PermissionAction) -> bool {
        self.has_permission_named(component.as_str(), action.as_str())
    }

    /// Wire-name variant of [`PermissionState::has_permission`].
    #[must_use]
    pub fn has_permission_named(&self, component: &str, action: &str) -> bool {
        self.permissions()
            .is_some_and(|permissions| permissions.allows_named(component, action))
    }
}
