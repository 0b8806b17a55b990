use std::sync::Arc;

use fieldops_core::NonEmptyString;
use fieldops_domain::{ConsoleComponent, PermissionAction, PermissionState, Readiness};
use tracing::{info, warn};

use crate::{Notification, Notifier};


/// Why a guarded navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// Permissions could not be loaded.
    PermissionsUnavailable,
    /// The user lacks the required action on the component.
    AccessDenied,
}

/// Redirect replacing a blocked navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Route to navigate to instead.
    pub to: String,
    /// Why the navigation was blocked.
    pub reason: RedirectReason,
}

/// Result of resolving a guarded route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome<P> {
    /// Permissions are still loading; nothing is decided yet.
    Loading,
    /// Navigation is replaced by a redirect.
    Redirect(Redirect),
    /// The page was rendered.
    Render(P),
}

/// Protects one routed page behind a component permission.
#[derive(Clone)]
pub struct RouteGuard {
    component: ConsoleComponent,
    required_action: PermissionAction,
    fallback_route: NonEmptyString,
    notifier: Arc<dyn Notifier>,
}

impl RouteGuard {
    /// Creates a guard requiring `read` on `component`.
    #[must_use]
    pub fn new(
        component: ConsoleComponent,
        fallback_route: NonEmptyString,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            component,
            required_action: PermissionAction::Read,
            fallback_route,
            notifier,
        }
    }

    /// Requires a different action than `read`.
    #[must_use]
    pub fn requiring(mut self, action: PermissionAction) -> Self {
        self.required_action = action;
        self
    }

    /// Returns the guarded component.
    #[must_use]
    pub fn component(&self) -> ConsoleComponent {
        self.component
    }

    /// Returns the action the guard checks.
    #[must_use]
    pub fn required_action(&self) -> PermissionAction {
        self.required_action
    }

    /// Resolves the route against the current permission state.
    ///
    /// `page` is only invoked when access is granted and receives `props`
    /// unchanged. Blocked attempts notify the user once and redirect to the
    /// fallback route.
    pub fn resolve<Props, Page>(
        &self,
        state: &PermissionState,
        props: Props,
        page: impl FnOnce(Props) -> Page,
    ) -> RouteOutcome<Page> {
        match state.readiness() {
            Readiness::NotReady => RouteOutcome::Loading,
            Readiness::ReadyWithError => {
                warn!(
                    component = %self.component,
                    error = ?state.error(),
                    "redirecting because permissions are unavailable"
                );
                self.notifier.dismiss_all();
                self.notifier.show(Notification::error(
                    "Unable to load your permissions. Please try again later.",
                ));
                self.redirect(RedirectReason::PermissionsUnavailable)
            }
            Readiness::ReadyWithData => {
                if state.has_permission(self.component, self.required_action) {
                    return RouteOutcome::Render(page(props));
                }

                info!(
                    component = %self.component,
                    action = %self.required_action,
                    fallback_route = %self.fallback_route.as_str(),
                    "blocked navigation to guarded route"
                );
                self.notifier.dismiss_all();
                self.notifier.show(Notification::warning(format!(
                    "Access denied: you do not have {} access to {}.",
                    self.required_action, self.component
                )));
                self.redirect(RedirectReason::AccessDenied)
            }
        }
    }

    fn redirect<Page>(&self, reason: RedirectReason) -> RouteOutcome<Page> {
        RouteOutcome::Redirect(Redirect {
            to: self.fallback_route.as_str().to_owned(),
            reason,
        })
    }
}
