use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};

use super::BlobStore;

/// S3-compatible blob storage for cover images and thumbnails.
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_base_url: String,
    url_marker: String,
}

impl S3BlobStore {
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        use aws_sdk_s3::config::Region;

        let mut aws_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        // Custom endpoint for S3-compatible storage like MinIO; credentials
        // come from the default AWS credential chain.
        if let Some(endpoint) = &config.endpoint {
            aws_config_builder = aws_config_builder.endpoint_url(endpoint);
        }

        let aws_config = aws_config_builder.load().await;

        Ok(Self {
            client: Client::new(&aws_config),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            url_marker: config.url_marker.clone(),
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                let error_msg = e.to_string();
                if error_msg.contains("403") || error_msg.contains("Forbidden") {
                    AppError::Storage("S3 auth failed (403): Check AWS credentials".to_string())
                } else if error_msg.contains("NoSuchBucket") {
                    AppError::Storage(format!("S3 bucket not found: {}", self.bucket))
                } else {
                    AppError::Storage(format!("S3 upload failed: {}", e))
                }
            })?;

        Ok(format!("{}/{}", self.public_base_url, path))
    }

    async fn remove(&self, url: &str) -> Result<()> {
        let key = url
            .strip_prefix(self.public_base_url.as_str())
            .map(|rest| rest.trim_start_matches('/'))
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::Storage(format!("URL is not hosted by this bucket: {}", url))
            })?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {}", e)))?;

        Ok(())
    }

    fn owns_url(&self, url: &str) -> bool {
        url.contains(&self.url_marker)
    }
}
