use std::sync::Arc;

use fieldops_core::NonEmptyString;
use fieldops_domain::{NavigationCatalog, NavigationItem, PermissionAction, PermissionState};

use crate::{Notifier, RouteGuard};

/// Derives sidebar visibility and route guards from the permission state.
#[derive(Clone)]
pub struct NavigationService {
    catalog: NavigationCatalog,
    fallback_route: NonEmptyString,
    notifier: Arc<dyn Notifier>,
}

impl NavigationService {
    /// Creates a navigation service over a catalog.
    #[must_use]
    pub fn new(
        catalog: NavigationCatalog,
        fallback_route: NonEmptyString,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            catalog,
            fallback_route,
            notifier,
        }
    }

    /// Returns the sidebar entries the current user may read, in order.
    #[must_use]
    pub fn visible_items<'a>(&'a self, state: &PermissionState) -> Vec<&'a NavigationItem> {
        self.catalog
            .items()
            .iter()
            .filter(|item| state.has_permission(item.component(), PermissionAction::Read))
            .collect()
    }

    /// Returns the guard protecting a catalog path.
    #[must_use]
    pub fn guard_for(&self, path: &str) -> Option<RouteGuard> {
        self.catalog.find_by_path(path).map(|item| {
            RouteGuard::new(
                item.component(),
                self.fallback_route.clone(),
                self.notifier.clone(),
            )
        })
    }

    /// Returns the route blocked navigations are sent to.
    #[must_use]
    pub fn fallback_route(&self) -> &NonEmptyString {
        &self.fallback_route
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fieldops_core::{NonEmptyString, RoleId};
    use fieldops_domain::{
        ConsoleComponent, NavigationCatalog, PermissionRecord, PermissionSet, PermissionState,
    };

    use super::NavigationService;
    use crate::{Notification, Notifier, RouteOutcome};

    struct SilentNotifier;

    impl Notifier for SilentNotifier {
        fn dismiss_all(&self) {}

        fn show(&self, _notification: Notification) {}
    }

    fn service() -> NavigationService {
        NavigationService::new(
            NavigationCatalog::console_default().unwrap_or_else(|_| unreachable!()),
            NonEmptyString::new("/dashboard").unwrap_or_else(|_| unreachable!()),
            Arc::new(SilentNotifier),
        )
    }

    fn technician_state() -> PermissionState {
        let role_id = RoleId::new("technician").unwrap_or_else(|_| unreachable!());
        let records = vec![
            PermissionRecord::new("Dashboard", [("read", true)]),
            PermissionRecord::new("On Call", [("read", true), ("write", true)]),
            PermissionRecord::new("Equipment", [("read", false)]),
        ];
        PermissionState::ready(PermissionSet::new(role_id, records).unwrap_or_default())
    }

    #[test]
    fn sidebar_shows_only_readable_components() {
        let service = service();
        let state = technician_state();

        let paths = service
            .visible_items(&state)
            .into_iter()
            .map(|item| item.path().as_str().to_owned())
            .collect::<Vec<_>>();

        assert_eq!(paths, vec!["/dashboard".to_owned(), "/on-call".to_owned()]);
    }

    #[test]
    fn sidebar_is_empty_while_loading() {
        assert!(service().visible_items(&PermissionState::Fetching).is_empty());
    }

    #[test]
    fn guard_for_path_uses_catalog_component() {
        let service = service();
        let guard = service.guard_for("/equipment");
        assert_eq!(
            guard.as_ref().map(|guard| guard.component()),
            Some(ConsoleComponent::Equipment)
        );

        let outcome = guard.map(|guard| guard.resolve(&technician_state(), (), |()| "page"));
        assert!(matches!(outcome, Some(RouteOutcome::Redirect(_))));
        assert!(service.guard_for("/unknown").is_none());
    }
}
