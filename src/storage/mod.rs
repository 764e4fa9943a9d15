//! Object storage for uploaded images
//!
//! Objects live under a bucket prefix (`community/`, `chat/`, ...) and are
//! addressed by a relative path. Public URLs are `<base>/files/<path>`.

pub mod local;
pub mod memory;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upload ceiling, 5 MB
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Buckets the client may upload into
pub const BUCKETS: [&str; 6] = ["avatars", "community", "consultas", "announcements", "chat", "content"];

const ALLOWED_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("upload of {size} bytes exceeds {max} bytes", max = MAX_UPLOAD_BYTES)]
    TooLarge { size: usize },

    #[error("content type {0} is not allowed")]
    UnsupportedType(String),

    #[error("invalid object path {0}")]
    InvalidPath(String),

    #[error("object {0} not found")]
    NotFound(String),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Io error on `path`, reported as `NotFound` when the file is missing
    pub fn from_io(path: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(path.to_string())
        } else {
            StorageError::Io(err)
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub path: String,
    pub public_url: String,
    pub size: usize,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `data` under `bucket` and returns its path and public URL.
    async fn put(&self, bucket: &str, data: Vec<u8>, content_type: &str)
    -> Result<StoredObject, StorageError>;

    /// Removes an object. Removing a missing object is `NotFound`.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Public URL of an object path.
    fn public_url(&self, path: &str) -> String;
}

/// Size and content-type checks shared by every backend.
/// Returns the file extension to use.
pub fn validate_upload(size: usize, content_type: &str) -> Result<&'static str, StorageError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(StorageError::TooLarge { size });
    }
    ALLOWED_TYPES
        .iter()
        .find(|(ct, _)| *ct == content_type)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| StorageError::UnsupportedType(content_type.to_string()))
}

/// Object paths are `<bucket>/<name>` with no traversal.
pub fn validate_path(path: &str) -> Result<(), StorageError> {
    let mut parts = path.split('/');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(bucket), Some(name), None)
            if BUCKETS.contains(&bucket) && !name.is_empty() && !name.starts_with('.')
    );
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidPath(path.to_string()))
    }
}

pub fn validate_bucket(bucket: &str) -> Result<(), StorageError> {
    if BUCKETS.contains(&bucket) {
        Ok(())
    } else {
        Err(StorageError::InvalidPath(bucket.to_string()))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/files/{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_ceiling_is_five_megabytes() {
        assert_eq!(validate_upload(MAX_UPLOAD_BYTES, "image/png").unwrap(), "png");
        assert!(matches!(
            validate_upload(MAX_UPLOAD_BYTES + 1, "image/png"),
            Err(StorageError::TooLarge { .. })
        ));
        assert!(matches!(
            validate_upload(10, "application/pdf"),
            Err(StorageError::UnsupportedType(_))
        ));
    }

    #[test]
    fn paths_cannot_escape_buckets() {
        assert!(validate_path("community/abc.png").is_ok());
        assert!(validate_path("../etc/passwd").is_err());
        assert!(validate_path("community/../../x").is_err());
        assert!(validate_path("unknown/abc.png").is_err());
        assert!(validate_path("community/.hidden").is_err());
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(matches!(
            StorageError::from_io("chat/a.png", missing),
            StorageError::NotFound(p) if p == "chat/a.png"
        ));

        let denied: StorageError = std::io::Error::from(std::io::ErrorKind::PermissionDenied).into();
        assert!(matches!(denied, StorageError::Io(_)));
        assert_eq!(
            StorageError::TooLarge { size: 6 }.to_string(),
            format!("upload of 6 bytes exceeds {MAX_UPLOAD_BYTES} bytes")
        );
    }
}
