//! Filesystem object store

use super::{ObjectStore, StorageError, StoredObject, join_url, validate_bucket, validate_path, validate_upload};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, instrument};
use uuid::Uuid;

pub struct LocalObjectStore {
    /// Root directory for all buckets (e.g. "./uploads")
    root_path: PathBuf,
    /// Base of public URLs (e.g. "http://127.0.0.1:3000")
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root_path: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root_path
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn put(
        &self,
        bucket: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        validate_bucket(bucket)?;
        let ext = validate_upload(data.len(), content_type)?;

        let path = format!("{}/{}.{}", bucket, Uuid::new_v4(), ext);
        let target = self.root_path.join(&path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, &data).await?;
        debug!(path = %path, "Object stored");

        Ok(StoredObject {
            public_url: self.public_url(&path),
            path,
            size: data.len(),
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        validate_path(path)?;
        fs::remove_file(self.root_path.join(path))
            .await
            .map_err(|e| StorageError::from_io(path, e))?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        join_url(&self.public_base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_delete_on_disk() {
        let root = std::env::temp_dir().join(format!("vitanova-store-{}", Uuid::new_v4()));
        let store = LocalObjectStore::new(&root, "http://localhost:3000/");

        let stored = store.put("community", vec![1, 2, 3], "image/png").await.unwrap();
        assert!(stored.path.starts_with("community/"));
        assert!(stored.path.ends_with(".png"));
        assert_eq!(stored.public_url, format!("http://localhost:3000/files/{}", stored.path));
        assert!(root.join(&stored.path).exists());

        store.delete(&stored.path).await.unwrap();
        assert!(!root.join(&stored.path).exists());
        assert!(matches!(store.delete(&stored.path).await, Err(StorageError::NotFound(_))));

        let _ = std::fs::remove_dir_all(&root);
    }
}
