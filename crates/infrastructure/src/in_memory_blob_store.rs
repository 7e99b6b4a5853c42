use std::collections::HashMap;

use async_trait::async_trait;
use taskboard_application::BlobStore;
use taskboard_core::{AppError, AppResult};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory attachment content store.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many blobs are stored.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Returns whether the store holds no blobs.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn store(&self, _filename: &str, bytes: Vec<u8>) -> AppResult<String> {
        let content_ref = Uuid::new_v4().to_string();
        self.blobs.write().await.insert(content_ref.clone(), bytes);
        Ok(content_ref)
    }

    async fn load(&self, content_ref: &str) -> AppResult<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(content_ref)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("blob '{content_ref}' does not exist")))
    }

    async fn remove(&self, content_ref: &str) -> AppResult<()> {
        self.blobs.write().await.remove(content_ref);
        Ok(())
    }
}
