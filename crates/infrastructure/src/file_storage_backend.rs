use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use fieldops_core::{AppError, AppResult};
use tracing::debug;

use crate::StorageBackend;

/// Storage backend keeping one `<key>.json` file per key in a directory.
pub struct FileStorageBackend {
    directory: PathBuf,
}

impl FileStorageBackend {
    /// Creates a backend rooted at `directory`; the directory is created on
    /// first write.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let is_plain = !key.is_empty()
            && key
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'));
        if !is_plain {
            return Err(AppError::Validation(format!(
                "storage key '{key}' must be alphanumeric"
            )));
        }

        Ok(self.directory.join(format!("{key}.json")))
    }
}

#[async_trait]
impl StorageBackend for FileStorageBackend {
    async fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(AppError::Internal(format!(
                "failed to read '{}': {error}",
                path.display()
            ))),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to create storage directory '{}': {error}",
                    self.directory.display()
                ))
            })?;

        // Readers never observe a half-written file.
        let staging_path = path.with_extension("json.tmp");
        tokio::fs::write(&staging_path, value)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write '{}': {error}",
                    staging_path.display()
                ))
            })?;
        tokio::fs::rename(&staging_path, &path)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to replace '{}': {error}", path.display()))
            })?;

        debug!(key = key, path = %path.display(), "stored item");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove '{}': {error}",
                path.display()
            ))),
        }
    }
}
