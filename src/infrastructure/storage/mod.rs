use async_trait::async_trait;
use thiserror::Error;
use tokio::fs::File;

pub mod s3;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 error: {0}")]
    Sdk(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write side of the object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads `length` bytes read from `body`'s current position.
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        body: File,
        length: u64,
    ) -> Result<(), StorageError>;

    /// Public URL of the object stored under `key`.
    fn object_url(&self, key: &str) -> String;
}

/// `https://<bucket>.s3.<region>.amazonaws.com/<key>`
pub fn object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}
