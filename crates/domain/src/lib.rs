//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod navigation;
mod permission;
mod security;
mod state;

pub use navigation::{NavigationCatalog, NavigationItem};
pub use permission::{CachedPermissions, PermissionRecord, PermissionSet};
pub use security::{ConsoleComponent, PermissionAction};
pub use state::{PermissionState, PermissionStatus, Readiness};
