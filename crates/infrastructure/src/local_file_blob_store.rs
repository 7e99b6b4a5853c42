//! Filesystem-backed attachment content store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use taskboard_application::BlobStore;
use taskboard_core::{AppError, AppResult};
use tracing::{debug, warn};
use uuid::Uuid;

/// Stores attachment bytes as files under one directory.
///
/// Content references are generated file names. The client filename only
/// contributes its extension.
#[derive(Debug, Clone)]
pub struct LocalFileBlobStore {
    root: PathBuf,
}

impl LocalFileBlobStore {
    /// Creates the store, creating `root` when it does not exist.
    pub async fn open(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to create upload directory '{}': {error}",
                root.display()
            ))
        })?;

        Ok(Self { root })
    }

    fn path_for(&self, content_ref: &str) -> AppResult<PathBuf> {
        let valid = !content_ref.is_empty()
            && content_ref.chars().all(|character| {
                character.is_ascii_alphanumeric() || matches!(character, '-' | '.')
            })
            && !content_ref.starts_with('.');
        if !valid {
            return Err(AppError::Validation(format!(
                "invalid blob reference '{content_ref}'"
            )));
        }

        Ok(self.root.join(content_ref))
    }
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|extension| extension.to_str())
        .filter(|extension| {
            !extension.is_empty()
                && extension.len() <= 16
                && extension
                    .chars()
                    .all(|character| character.is_ascii_alphanumeric())
        })
        .map(str::to_ascii_lowercase)
}

#[async_trait]
impl BlobStore for LocalFileBlobStore {
    async fn store(&self, filename: &str, bytes: Vec<u8>) -> AppResult<String> {
        let content_ref = match extension_of(filename) {
            Some(extension) => format!("{}.{extension}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        let path = self.path_for(&content_ref)?;

        tokio::fs::write(&path, bytes).await.map_err(|error| {
            warn!(path = %path.display(), %error, "failed to write blob file");
            AppError::Internal(format!(
                "failed to write blob '{}': {error}",
                path.display()
            ))
        })?;

        Ok(content_ref)
    }

    async fn load(&self, content_ref: &str) -> AppResult<Vec<u8>> {
        let path = self.path_for(content_ref)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.kind() == ErrorKind::NotFound => Err(AppError::NotFound(format!(
                "blob '{content_ref}' does not exist"
            ))),
            Err(error) => Err(AppError::Internal(format!(
                "failed to read blob '{}': {error}",
                path.display()
            ))),
        }
    }

    async fn remove(&self, content_ref: &str) -> AppResult<()> {
        let path = self.path_for(content_ref)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(content_ref = %content_ref, "blob already absent");
                Ok(())
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to remove blob file");
                Err(AppError::Internal(format!(
                    "failed to remove blob '{}': {error}",
                    path.display()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use taskboard_application::BlobStore;
    use taskboard_core::AppError;

    use super::{LocalFileBlobStore, extension_of};

    #[test]
    fn extension_is_kept_only_when_simple() {
        assert_eq!(extension_of("Report.PDF"), Some("pdf".to_owned()));
        assert_eq!(extension_of("archive"), None);
        assert_eq!(extension_of("weird.ex$e"), None);
    }

    #[tokio::test]
    async fn stores_loads_and_removes_files() {
        let root = std::env::temp_dir().join(format!("taskboard-blobs-{}", uuid::Uuid::new_v4()));
        let store = LocalFileBlobStore::open(&root)
            .await
            .unwrap_or_else(|_| panic!("test"));

        let content_ref = store
            .store("notes.txt", b"hello".to_vec())
            .await
            .unwrap_or_else(|_| panic!("test"));
        assert!(content_ref.ends_with(".txt"));

        let loaded = store
            .load(&content_ref)
            .await
            .unwrap_or_else(|_| panic!("test"));
        assert_eq!(loaded, b"hello".to_vec());

        assert!(store.remove(&content_ref).await.is_ok());
        assert!(store.remove(&content_ref).await.is_ok());
        assert!(matches!(
            store.load(&content_ref).await,
            Err(AppError::NotFound(_))
        ));

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn rejects_path_traversal_references() {
        let root = std::env::temp_dir().join(format!("taskboard-blobs-{}", uuid::Uuid::new_v4()));
        let store = LocalFileBlobStore::open(&root)
            .await
            .unwrap_or_else(|_| panic!("test"));

        assert!(matches!(
            store.load("../etc/passwd").await,
            Err(AppError::Validation(_))
        ));

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn failed_removal_is_reported() {
        let root = std::env::temp_dir().join(format!("taskboard-blobs-{}", uuid::Uuid::new_v4()));
        let store = LocalFileBlobStore::open(&root)
            .await
            .unwrap_or_else(|_| panic!("test"));
        tokio::fs::create_dir(root.join("occupied"))
            .await
            .unwrap_or_else(|_| panic!("test"));

        assert!(matches!(
            store.remove("occupied").await,
            Err(AppError::Internal(_))
        ));

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
