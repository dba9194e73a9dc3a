//! Object storage for poster images

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

/// Stores bytes under a key and returns the public URL of the object
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String>;
}

/// Writes objects to `<root>/<bucket>/<key>` on the local filesystem
#[derive(Clone)]
pub struct DiskObjectStore {
    root: PathBuf,
    bucket: String,
    public_base_url: String,
}

impl DiskObjectStore {
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.root.clone(), config.bucket.clone(), config.public_base_url.clone())
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url.trim_end_matches('/'), self.bucket, key)
    }
}

#[async_trait]
impl ObjectStore for DiskObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String> {
        let path = self.root.join(&self.bucket).join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let size = bytes.len();
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!(key, size, content_type, "object stored");
        Ok(self.url_for(key))
    }
}

/// Keeps objects in memory; used when no storage root is configured and in tests
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<Mutex<HashMap<String, (Vec<u8>, String)>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored bytes and content type for a key
    pub fn get(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(format!("memory://{}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disk_store_writes_under_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskObjectStore::new(dir.path(), "efilm", "http://localhost:8080/static/");

        let url = store
            .put("images/movies/Parasite.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:8080/static/efilm/images/movies/Parasite.png");
        let written = std::fs::read(dir.path().join("efilm/images/movies/Parasite.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_disk_store_overwrites_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskObjectStore::new(dir.path(), "efilm", "http://localhost");

        store.put("a.png", vec![1], "image/png").await.unwrap();
        store.put("a.png", vec![2, 2], "image/png").await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("efilm/a.png")).unwrap(), vec![2, 2]);
    }

    #[tokio::test]
    async fn test_memory_store_keeps_content_type() {
        let store = MemoryObjectStore::new();
        let url = store.put("k.jpeg", vec![9], "image/jpeg").await.unwrap();
        assert_eq!(url, "memory://k.jpeg");
        assert_eq!(store.get("k.jpeg"), Some((vec![9], "image/jpeg".to_string())));
    }
}
