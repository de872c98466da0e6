use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{error::DisplayErrorContext, presigning::PresigningConfig, Client};
use lambda_http::tracing;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("invalid presigning config: {0}")]
    PresignConfig(String),

    #[error("failed to presign {operation} for {key}: {message}")]
    Presign {
        operation: &'static str,
        key: String,
        message: String,
    },

    #[error("failed to put {key}: {message}")]
    Put { key: String, message: String },
}

/// The three calls the handlers make into the bucket. The region is fixed
/// when the implementation is built.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn presign_get(&self, bucket: &str, key: &str, ttl_secs: u64)
        -> Result<String, StorageError>;

    async fn presign_put(&self, bucket: &str, key: &str, ttl_secs: u64)
        -> Result<String, StorageError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Loads the default credential chain pinned to `region`.
    pub async fn for_region(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::new(Client::new(&config))
    }
}

fn presigning(ttl_secs: u64) -> Result<PresigningConfig, StorageError> {
    PresigningConfig::expires_in(Duration::from_secs(ttl_secs))
        .map_err(|e| StorageError::PresignConfig(e.to_string()))
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        ttl_secs: u64,
    ) -> Result<String, StorageError> {
        let presigned_request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning(ttl_secs)?)
            .await
            .map_err(|e| StorageError::Presign {
                operation: "GetObject",
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(presigned_request.uri().to_string())
    }

    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        ttl_secs: u64,
    ) -> Result<String, StorageError> {
        let presigned_request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning(ttl_secs)?)
            .await
            .map_err(|e| StorageError::Presign {
                operation: "PutObject",
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(presigned_request.uri().to_string())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        tracing::debug!(bucket, key, len = bytes.len(), "putting object");
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(bytes.into())
            .send()
            .await
            .map_err(|e| StorageError::Put {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;
        Ok(())
    }
}
