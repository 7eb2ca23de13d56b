use crate::config::env::{self, EnvKey};
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

/// 1 GiB
pub const DEFAULT_MAX_VIDEO_BYTES: usize = 1 << 30;
/// 10 MiB
pub const DEFAULT_MAX_THUMBNAIL_BYTES: usize = 10 << 20;

/// Where uploaded thumbnails end up.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailStorage {
    /// Object store, the production path.
    S3,
    /// In-process map. Development and tests only; lost on restart.
    Memory,
}

impl FromStr for ThumbnailStorage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(ThumbnailStorage::S3),
            "memory" => Ok(ThumbnailStorage::Memory),
            other => Err(format!("unknown thumbnail storage '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    pub aws_access_key: String,
    pub aws_secret_key: String,
    pub upload_tmp_dir: PathBuf,
    pub max_video_bytes: usize,
    pub max_thumbnail_bytes: usize,
    pub ffprobe_path: String,
    pub thumbnail_storage: ThumbnailStorage,
    pub public_base_url: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        let server_port = env::get_parsed(EnvKey::ServerPort, 3000);
        let default_base_url = format!("http://localhost:{}", server_port);

        Ok(Self {
            server_port,
            database_url: env::get(EnvKey::DatabaseUrl)?,
            db_max_connections: env::get_parsed(EnvKey::DbMaxConnections, 10),
            jwt_secret: env::get(EnvKey::JwtSecret)?,
            s3_bucket: env::get(EnvKey::S3Bucket)?,
            s3_region: env::get(EnvKey::S3Region)?,
            s3_endpoint: env::get_opt(EnvKey::S3Endpoint),
            aws_access_key: env::get(EnvKey::AwsAccessKey)?,
            aws_secret_key: env::get(EnvKey::AwsSecretKey)?,
            upload_tmp_dir: env::get_opt(EnvKey::UploadTmpDir)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_video_bytes: env::get_parsed(EnvKey::MaxVideoBytes, DEFAULT_MAX_VIDEO_BYTES),
            max_thumbnail_bytes: env::get_parsed(
                EnvKey::MaxThumbnailBytes,
                DEFAULT_MAX_THUMBNAIL_BYTES,
            ),
            ffprobe_path: env::get_or(EnvKey::FfprobePath, "ffprobe"),
            thumbnail_storage: env::get_parsed(EnvKey::ThumbnailStorage, ThumbnailStorage::S3),
            public_base_url: env::get_or(EnvKey::PublicBaseUrl, &default_base_url)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}
