use super::model::Video;
use crate::infrastructure::db::pool::DbPool;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Video {0} no longer exists")]
    Missing(Uuid),
}

/// The metadata store. The ingestion pipeline only reads a record and writes
/// its locator fields back; it never creates or deletes videos.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, RepositoryError>;

    async fn update_video(&self, video: &Video) -> Result<(), RepositoryError>;
}

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: DbPool,
}

impl PgVideoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, RepositoryError> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, title, description, user_id, thumbnail_url, video_url, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    async fn update_video(&self, video: &Video) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = $1, description = $2, thumbnail_url = $3, video_url = $4, updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Missing(video.id));
        }
        Ok(())
    }
}
