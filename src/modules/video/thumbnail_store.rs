use super::key::storage_key;
use crate::common::buffered::BufferedAsset;
use crate::common::error::AppResult;
use crate::infrastructure::storage::ObjectStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub data: Bytes,
    /// As declared by the uploader.
    pub media_type: String,
}

/// Where thumbnails live. Returns the locator to record on the video.
#[async_trait]
pub trait ThumbnailStore: Send + Sync {
    /// `extension` is already derived from the declared media type.
    async fn put(&self, video_id: Uuid, thumbnail: Thumbnail, extension: &str)
    -> AppResult<String>;

    /// Thumbnails this process serves itself; `None` when they live elsewhere.
    async fn get(&self, video_id: Uuid) -> AppResult<Option<Thumbnail>>;
}

/// Buffers to disk and commits to the object store under an unprefixed key.
pub struct ObjectThumbnailStore {
    storage: Arc<dyn ObjectStore>,
    tmp_dir: PathBuf,
}

impl ObjectThumbnailStore {
    pub fn new(storage: Arc<dyn ObjectStore>, tmp_dir: PathBuf) -> Self {
        Self { storage, tmp_dir }
    }
}

#[async_trait]
impl ThumbnailStore for ObjectThumbnailStore {
    async fn put(
        &self,
        video_id: Uuid,
        thumbnail: Thumbnail,
        extension: &str,
    ) -> AppResult<String> {
        let asset = BufferedAsset::from_bytes(&self.tmp_dir, extension, &thumbnail.data).await?;
        let key = storage_key(None, extension)?;

        self.storage
            .put_object(&key, &thumbnail.media_type, asset.reader().await?, asset.len())
            .await?;

        info!(%video_id, key = %key, "Thumbnail stored");
        Ok(self.storage.object_url(&key))
    }

    async fn get(&self, _video_id: Uuid) -> AppResult<Option<Thumbnail>> {
        Ok(None)
    }
}

/// Keeps thumbnails in process memory and serves them from
/// `/api/thumbnails/{id}`. Not durable.
pub struct MemoryThumbnailStore {
    base_url: String,
    entries: RwLock<HashMap<Uuid, Thumbnail>>,
}

impl MemoryThumbnailStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ThumbnailStore for MemoryThumbnailStore {
    async fn put(
        &self,
        video_id: Uuid,
        thumbnail: Thumbnail,
        _extension: &str,
    ) -> AppResult<String> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(video_id, thumbnail);

        Ok(format!("{}/api/thumbnails/{}", self.base_url, video_id))
    }

    async fn get(&self, video_id: Uuid) -> AppResult<Option<Thumbnail>> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&video_id)
            .cloned())
    }
}
