use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tubely::config::settings::{AppConfig, ThumbnailStorage};
use tubely::infrastructure::db::pool::connect_to_db;
use tubely::infrastructure::media::{FfprobeProber, MediaProber};
use tubely::infrastructure::storage::ObjectStore;
use tubely::infrastructure::storage::s3::StorageService;
use tubely::modules::video::repository::PgVideoRepository;
use tubely::modules::video::thumbnail_store::{
    MemoryThumbnailStore, ObjectThumbnailStore, ThumbnailStore,
};
use tubely::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting server...");

    let config = AppConfig::new().context("Missing required environment variable")?;

    let pool = connect_to_db(&config.database_url, config.db_max_connections)
        .await
        .context("Couldn't connect to database")?;

    let storage: Arc<dyn ObjectStore> = Arc::new(StorageService::new(
        &config.s3_bucket,
        &config.s3_region,
        config.s3_endpoint.as_deref(),
        &config.aws_access_key,
        &config.aws_secret_key,
    ));

    let thumbnails: Arc<dyn ThumbnailStore> = match config.thumbnail_storage {
        ThumbnailStorage::S3 => Arc::new(ObjectThumbnailStore::new(
            storage.clone(),
            config.upload_tmp_dir.clone(),
        )),
        ThumbnailStorage::Memory => {
            info!("Thumbnails are kept in memory and will not survive a restart");
            Arc::new(MemoryThumbnailStore::new(config.public_base_url.clone()))
        }
    };

    let prober: Arc<dyn MediaProber> = Arc::new(FfprobeProber::new(config.ffprobe_path.clone()));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let state = AppState::new(
        config,
        Arc::new(PgVideoRepository::new(pool)),
        storage,
        prober,
        thumbnails,
    );

    let app = tubely::app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Couldn't bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
