#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use time::OffsetDateTime;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tower::ServiceExt;
use tubely::config::settings::{AppConfig, ThumbnailStorage};
use tubely::infrastructure::media::{MediaProber, ProbeError, StreamDescriptor};
use tubely::infrastructure::storage::{ObjectStore, StorageError, object_url};
use tubely::modules::auth::service::AuthService;
use tubely::modules::video::model::Video;
use tubely::modules::video::repository::{RepositoryError, VideoRepository};
use tubely::modules::video::thumbnail_store::{
    MemoryThumbnailStore, ObjectThumbnailStore, ThumbnailStore,
};
use tubely::state::AppState;
use uuid::Uuid;

pub const BUCKET: &str = "tubely-test";
pub const REGION: &str = "eu-central-1";
pub const JWT_SECRET: &str = "test-secret";
pub const BASE_URL: &str = "http://localhost:8091";
const BOUNDARY: &str = "tubely-test-boundary";

// --- fakes ---

#[derive(Default)]
pub struct FakeVideos {
    videos: Mutex<HashMap<Uuid, Video>>,
    fail_updates: bool,
}

impl FakeVideos {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl VideoRepository for FakeVideos {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn update_video(&self, video: &Video) -> Result<(), RepositoryError> {
        if self.fail_updates {
            return Err(RepositoryError::Missing(video.id));
        }
        self.insert(video.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub declared_length: u64,
}

#[derive(Default)]
pub struct RecordingStore {
    puts: Mutex<Vec<StoredObject>>,
    fail: bool,
}

impl RecordingStore {
    pub fn puts(&self) -> Vec<StoredObject> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        mut body: File,
        length: u64,
    ) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::Sdk("bucket unavailable".to_string()));
        }
        let mut data = Vec::new();
        body.read_to_end(&mut data).await?;
        self.puts.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            content_type: content_type.to_string(),
            data,
            declared_length: length,
        });
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        object_url(BUCKET, REGION, key)
    }
}

pub struct FakeProber {
    streams: Option<Vec<StreamDescriptor>>,
    /// Path and on-disk size seen at each probe.
    calls: Mutex<Vec<(PathBuf, u64)>>,
}

impl FakeProber {
    pub fn ratio(ratio: &str) -> Self {
        Self {
            streams: Some(vec![StreamDescriptor::with_aspect_ratio(ratio)]),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            streams: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, u64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaProber for FakeProber {
    async fn probe(&self, path: &Path) -> Result<Vec<StreamDescriptor>, ProbeError> {
        let size = std::fs::metadata(path)?.len();
        self.calls.lock().unwrap().push((path.to_path_buf(), size));
        match &self.streams {
            Some(streams) => Ok(streams.clone()),
            None => Err(ProbeError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "moov atom not found".to_string(),
            }),
        }
    }
}

// --- harness ---

pub struct Options {
    pub prober: FakeProber,
    pub store_fails: bool,
    pub commit_fails: bool,
    pub max_video_bytes: usize,
    pub max_thumbnail_bytes: usize,
    pub thumbnail_storage: ThumbnailStorage,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prober: FakeProber::ratio("16:9"),
            store_fails: false,
            commit_fails: false,
            max_video_bytes: 1 << 20,
            max_thumbnail_bytes: 1 << 16,
            thumbnail_storage: ThumbnailStorage::S3,
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub videos: Arc<FakeVideos>,
    pub store: Arc<RecordingStore>,
    pub prober: Arc<FakeProber>,
    pub tmp: TempDir,
    pub owner: Uuid,
    pub video_id: Uuid,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(Options::default())
    }

    pub fn with(options: Options) -> Self {
        let tmp = tempfile::tempdir().expect("failed creating temp dir");

        let config = AppConfig {
            server_port: 0,
            database_url: "postgres://unused".to_string(),
            db_max_connections: 1,
            jwt_secret: JWT_SECRET.to_string(),
            s3_bucket: BUCKET.to_string(),
            s3_region: REGION.to_string(),
            s3_endpoint: None,
            aws_access_key: "test".to_string(),
            aws_secret_key: "test".to_string(),
            upload_tmp_dir: tmp.path().to_path_buf(),
            max_video_bytes: options.max_video_bytes,
            max_thumbnail_bytes: options.max_thumbnail_bytes,
            ffprobe_path: "ffprobe".to_string(),
            thumbnail_storage: options.thumbnail_storage,
            public_base_url: BASE_URL.to_string(),
        };

        let videos = Arc::new(FakeVideos {
            fail_updates: options.commit_fails,
            ..FakeVideos::default()
        });
        let store = Arc::new(RecordingStore {
            fail: options.store_fails,
            ..RecordingStore::default()
        });
        let prober = Arc::new(options.prober);

        let thumbnails: Arc<dyn ThumbnailStore> = match options.thumbnail_storage {
            ThumbnailStorage::S3 => Arc::new(ObjectThumbnailStore::new(
                store.clone(),
                tmp.path().to_path_buf(),
            )),
            ThumbnailStorage::Memory => Arc::new(MemoryThumbnailStore::new(BASE_URL)),
        };

        let owner = Uuid::new_v4();
        let video_id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        videos.insert(Video {
            id: video_id,
            title: "Boots demo".to_string(),
            description: Some("a test video".to_string()),
            user_id: owner,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        });

        let state = AppState::new(config, videos.clone(), store.clone(), prober.clone(), thumbnails);
        let router = tubely::app::create_app(state);

        Self {
            router,
            videos,
            store,
            prober,
            tmp,
            owner,
            video_id,
        }
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        AuthService::make_jwt(user_id, JWT_SECRET, 300).expect("failed signing token")
    }

    pub fn owner_token(&self) -> String {
        self.token_for(self.owner)
    }

    pub fn video(&self) -> Video {
        self.videos.get(self.video_id).expect("seeded video missing")
    }

    /// Files left behind in the upload temp directory.
    pub fn stray_temp_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.tmp.path())
            .expect("failed reading temp dir")
            .map(|entry| entry.expect("bad dir entry").path())
            .collect()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router failed")
    }
}

pub fn multipart_body(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(uri: &str, token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).expect("failed building request")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("failed building request")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed reading body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body was not JSON")
}
