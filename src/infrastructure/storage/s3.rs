use super::{ObjectStore, StorageError};
use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use tokio::fs::File;
use tracing::{info, warn};

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
    pub bucket: String,
    pub region: String,
}

impl StorageService {
    pub fn new(
        bucket: &str,
        region: &str,
        endpoint: Option<&str>,
        access_key: &str,
        secret_key: &str,
    ) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials);

        if let Some(endpoint) = endpoint {
            // MinIO and other S3-compatible stores need path-style addressing
            builder = builder.endpoint_url(endpoint).force_path_style(true);
            warn!(
                "S3 endpoint overridden to {}; object URLs still use the AWS host format",
                endpoint
            );
        }

        let client = Client::from_conf(builder.build());

        info!("✅ S3 client ready for bucket {} ({})", bucket, region);

        Self {
            client,
            bucket: bucket.to_string(),
            region: region.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        body: File,
        length: u64,
    ) -> Result<(), StorageError> {
        let body = ByteStream::read_from()
            .file(body)
            .build()
            .await
            .map_err(|e| StorageError::Sdk(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .content_length(length as i64)
            .send()
            .await
            .map_err(|e| StorageError::Sdk(DisplayErrorContext(&e).to_string()))?;

        info!(key, bytes = length, "Stored object in {}", self.bucket);
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        super::object_url(&self.bucket, &self.region, key)
    }
}
