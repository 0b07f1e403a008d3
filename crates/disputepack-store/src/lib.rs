mod local;

pub use local::LocalStore;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Internal(String),
}

/// A store for opaque blobs keyed by string paths. Uploaded evidence
/// originals and generated packets both live here; database rows reference
/// blobs by key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write (create or overwrite) an object.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError>;

    /// Read an object. Returns `StoreError::NotFound` if absent.
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Delete an object. No-op if absent.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Check if an object exists.
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        match self.get(key).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

// -- Key helpers --

pub fn evidence_key(user_id: &str, dispute_id: &str, upload_id: &str, filename: &str) -> String {
    format!("uploads/{user_id}/{dispute_id}/{upload_id}/{filename}")
}

pub fn packet_key(user_id: &str, filename: &str) -> String {
    format!("packets/{user_id}/{filename}")
}

/// Reduce a client-supplied filename to a safe path component. Anything
/// resembling a path separator is dropped; an empty result becomes "file".
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim()
        .trim_matches('.');
    if base.is_empty() {
        "file".to_string()
    } else {
        base.to_string()
    }
}
