//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_notifier;
mod durable_storage;
mod file_storage_backend;
mod http_permission_source;
mod in_memory_storage_backend;

pub use console_notifier::ConsoleNotifier;
pub use durable_storage::{
    DurableStorage, PERMISSION_CACHE_STORAGE_KEY, SESSION_STORAGE_KEY, StorageBackend,
};
pub use file_storage_backend::FileStorageBackend;
pub use http_permission_source::HttpPermissionSource;
pub use in_memory_storage_backend::InMemoryStorageBackend;
