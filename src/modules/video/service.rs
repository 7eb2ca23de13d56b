use super::classify::AspectClass;
use super::key::storage_key;
use super::model::Video;
use super::thumbnail_store::Thumbnail;
use crate::common::buffered::BufferedAsset;
use crate::common::error::{AppError, AppResult};
use crate::common::upload::Upload;
use crate::infrastructure::media::MediaProber;
use crate::state::AppState;
use mime::Mime;
use std::path::Path;
use tracing::{error, info, warn};
use uuid::Uuid;

/// The only media type accepted for videos.
pub const VIDEO_MEDIA_TYPE: &str = "video/mp4";
const VIDEO_EXTENSION: &str = "mp4";

pub struct VideoService;

impl VideoService {
    pub async fn get_video(state: &AppState, video_id: Uuid) -> AppResult<Video> {
        state
            .videos
            .get_video(video_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))
    }

    /// Buffers the upload, classifies it by aspect ratio, stores it under a
    /// classified key and points the video record at it.
    pub async fn upload_video(
        state: &AppState,
        video_id: Uuid,
        user_id: Uuid,
        upload: Upload,
    ) -> AppResult<Video> {
        let media_type = parse_media_type(&upload.content_type)?;
        if media_type.essence_str() != VIDEO_MEDIA_TYPE {
            return Err(AppError::UnsupportedMediaType(format!(
                "expected {}, got {}",
                VIDEO_MEDIA_TYPE, upload.content_type
            )));
        }

        let mut video = Self::authorize(state, video_id, user_id).await?;

        info!(
            %video_id,
            %user_id,
            file_name = upload.file_name.as_deref().unwrap_or("<none>"),
            bytes = upload.len(),
            "Uploading video"
        );

        let mut asset = BufferedAsset::create(&state.config.upload_tmp_dir, VIDEO_EXTENSION)?;
        asset.write_all(&upload.body).await?;
        asset.finish().await?;
        asset.rewind().await?;

        let class = classify(state.prober.as_ref(), asset.path()).await;
        let key = storage_key(Some(class.key_prefix()), VIDEO_EXTENSION)?;

        state
            .storage
            .put_object(&key, &upload.content_type, asset.reader().await?, asset.len())
            .await
            .map_err(|e| {
                error!(%video_id, key = %key, "Couldn't upload video: {}", e);
                AppError::from(e)
            })?;

        video.video_url = Some(state.storage.object_url(&key));
        Self::commit(state, &video).await?;

        info!(%video_id, %class, key = %key, "Video uploaded");
        Ok(video)
    }

    /// Stores a thumbnail through the configured `ThumbnailStore` and records
    /// its locator. The stored extension is the declared subtype.
    pub async fn upload_thumbnail(
        state: &AppState,
        video_id: Uuid,
        user_id: Uuid,
        upload: Upload,
    ) -> AppResult<Video> {
        let media_type = parse_media_type(&upload.content_type)?;
        if media_type.type_() != mime::IMAGE {
            return Err(AppError::UnsupportedMediaType(format!(
                "expected an image, got {}",
                upload.content_type
            )));
        }

        let mut video = Self::authorize(state, video_id, user_id).await?;

        info!(
            %video_id,
            %user_id,
            file_name = upload.file_name.as_deref().unwrap_or("<none>"),
            bytes = upload.len(),
            "Uploading thumbnail"
        );

        let extension = media_type.subtype().as_str().to_string();
        let thumbnail = Thumbnail {
            data: upload.body,
            media_type: upload.content_type,
        };
        let url = state.thumbnails.put(video_id, thumbnail, &extension).await?;

        video.thumbnail_url = Some(url);
        Self::commit(state, &video).await?;

        Ok(video)
    }

    pub async fn get_thumbnail(state: &AppState, video_id: Uuid) -> AppResult<Thumbnail> {
        state
            .thumbnails
            .get(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))
    }

    async fn authorize(state: &AppState, video_id: Uuid, user_id: Uuid) -> AppResult<Video> {
        let video = Self::get_video(state, video_id).await?;
        if video.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can't upload media for another user's video".to_string(),
            ));
        }
        Ok(video)
    }

    // The object is already stored when this runs; a failure here leaves it
    // orphaned in the bucket.
    async fn commit(state: &AppState, video: &Video) -> AppResult<()> {
        state.videos.update_video(video).await.map_err(|e| {
            error!(video_id = %video.id, "Couldn't update video after upload: {}", e);
            AppError::MetadataCommit(e.to_string())
        })
    }
}

fn parse_media_type(declared: &str) -> AppResult<Mime> {
    declared
        .parse::<Mime>()
        .map_err(|_| AppError::UnsupportedMediaType(format!("couldn't parse '{}'", declared)))
}

/// Probe failures degrade to `Other` instead of failing the upload.
async fn classify(prober: &dyn MediaProber, path: &Path) -> AspectClass {
    match prober.probe(path).await {
        Ok(streams) => AspectClass::from_streams(&streams),
        Err(e) => {
            warn!("Couldn't probe {}, classifying as other: {}", path.display(), e);
            AspectClass::Other
        }
    }
}
