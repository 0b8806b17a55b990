//! Application services and ports.

#![forbid(unsafe_code)]

mod access_gate;
mod navigation_service;
mod notification_ports;
mod permission_ports;
mod permission_store;
mod route_guard;
mod session_service;

pub use access_gate::{AccessGate, GateView, Placeholder};
pub use navigation_service::NavigationService;
pub use notification_ports::{Notification, NotificationLevel, Notifier};
pub use permission_ports::{PermissionCacheRepository, PermissionSource, SessionRepository};
pub use permission_store::PermissionStore;
pub use route_guard::{Redirect, RedirectReason, RouteGuard, RouteOutcome};
pub use session_service::SessionService;
