//! Provider-agnostic storage for uploaded binary content such as profile
//! photos. Callers persist only the reference returned by `upload_file`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory: {0}")]
    CreateDirFailed(#[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    WriteFileFailed(#[source] std::io::Error),

    #[error("Failed to delete file: {0}")]
    DeleteFileFailed(#[source] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait::async_trait]
pub trait StorageService: Send + Sync {
    /// Stores `data` under `key` and returns the opaque reference to persist.
    async fn upload_file(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, StorageError>;

    /// Removes the object stored under `key`. Missing objects are not an error.
    async fn delete_file(&self, key: &str) -> Result<(), StorageError>;
}

#[cfg(feature = "storage-local")]
pub mod local {
    use std::path::{Component, Path, PathBuf};

    use async_trait::async_trait;
    use tokio::fs;

    use super::*;

    /// Saves files under a directory on the local disk.
    #[derive(Clone)]
    pub struct LocalStorageService {
        base_path: PathBuf,
        base_url: String,
    }

    impl LocalStorageService {
        pub fn new(base_path: String, base_url: String) -> Self {
            Self { base_path: PathBuf::from(base_path), base_url: base_url.trim_end_matches('/').to_string() }
        }

        pub fn base_path(&self) -> &Path {
            &self.base_path
        }

        fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
            let relative = Path::new(key);
            let is_plain = !key.is_empty() && relative.components().all(|c| matches!(c, Component::Normal(_)));

            if !is_plain {
                return Err(StorageError::InvalidKey(key.to_string()));
            }

            Ok(self.base_path.join(relative))
        }
    }

    #[async_trait]
    impl StorageService for LocalStorageService {
        async fn upload_file(&self, key: &str, data: Vec<u8>, _: &str) -> Result<String, StorageError> {
            let file_path = self.resolve(key)?;

            if let Some(parent_dir) = file_path.parent() {
                fs::create_dir_all(parent_dir).await.map_err(StorageError::CreateDirFailed)?;
            }

            fs::write(&file_path, data).await.map_err(StorageError::WriteFileFailed)?;

            Ok(format!("{}/{}", self.base_url, key))
        }

        async fn delete_file(&self, key: &str) -> Result<(), StorageError> {
            let file_path = self.resolve(key)?;

            match fs::remove_file(&file_path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::DeleteFileFailed(e)),
            }
        }
    }
}
