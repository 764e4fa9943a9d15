//! In-memory object store, used by tests and ephemeral deployments

use super::{ObjectStore, StorageError, StoredObject, join_url, validate_bucket, validate_path, validate_upload};
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

pub struct MemoryObjectStore {
    objects: DashMap<String, Vec<u8>>,
    public_base_url: String,
}

impl MemoryObjectStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: DashMap::new(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        bucket: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        validate_bucket(bucket)?;
        let ext = validate_upload(data.len(), content_type)?;
        let path = format!("{}/{}.{}", bucket, Uuid::new_v4(), ext);
        let size = data.len();
        self.objects.insert(path.clone(), data);
        Ok(StoredObject {
            public_url: self.public_url(&path),
            path,
            size,
        })
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        validate_path(path)?;
        self.objects
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    fn public_url(&self, path: &str) -> String {
        join_url(&self.public_base_url, path)
    }
}
