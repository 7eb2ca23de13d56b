use crate::config::settings::AppConfig;
use crate::infrastructure::media::MediaProber;
use crate::infrastructure::storage::ObjectStore;
use crate::modules::video::repository::VideoRepository;
use crate::modules::video::thumbnail_store::ThumbnailStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn ObjectStore>,
    pub prober: Arc<dyn MediaProber>,
    pub thumbnails: Arc<dyn ThumbnailStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn ObjectStore>,
        prober: Arc<dyn MediaProber>,
        thumbnails: Arc<dyn ThumbnailStore>,
    ) -> Self {
        Self {
            config,
            videos,
            storage,
            prober,
            thumbnails,
        }
    }
}
