//! S3 object storage for project files.
//!
//! One bucket holds every project file under the key scheme
//! `{project_id}/{file_name}`. Replacing a file is delete-then-upload and is
//! deliberately not transactional: a failure between the two steps leaves
//! the project temporarily without a file and is surfaced to the caller.

use std::time::Duration;

use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client;

/// Upload size cap enforced before anything reaches the bucket.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Download links expire after 15 minutes.
const PRESIGN_EXPIRY: Duration = Duration::from_secs(900);

/// Error type for object storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object upload failed: {0}")]
    Upload(String),

    #[error("object deletion failed: {0}")]
    Delete(String),

    #[error("presigned URL generation failed: {0}")]
    Presign(String),
}

/// Configuration for the S3 client, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// S3-compatible endpoint URL (MinIO in development).
    pub endpoint: String,
    /// Bucket holding all project files.
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var         | Required | Default      |
    /// |-----------------|----------|--------------|
    /// | `S3_ENDPOINT`   | **yes**  | --           |
    /// | `S3_ACCESS_KEY` | **yes**  | --           |
    /// | `S3_SECRET_KEY` | **yes**  | --           |
    /// | `S3_BUCKET`     | no       | `projects`   |
    /// | `S3_REGION`     | no       | `us-east-1`  |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing; storage misconfiguration
    /// should fail at startup, not on the first upload.
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("S3_ENDPOINT").expect("S3_ENDPOINT must be set"),
            access_key: std::env::var("S3_ACCESS_KEY").expect("S3_ACCESS_KEY must be set"),
            secret_key: std::env::var("S3_SECRET_KEY").expect("S3_SECRET_KEY must be set"),
            bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "projects".into()),
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
        }
    }
}

/// Thin client for the project-file bucket.
#[derive(Clone)]
pub struct ObjectStorage {
    client: Client,
    bucket: String,
}

impl ObjectStorage {
    /// Build a client against the configured endpoint.
    ///
    /// Path-style addressing is forced for MinIO compatibility.
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = aws_credential_types::Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "traduko-storage",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }

    /// The storage key for a project file.
    pub fn file_key(project_id: &impl std::fmt::Display, file_name: &str) -> String {
        format!("{project_id}/{file_name}")
    }

    /// Upload a file to the bucket.
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(key, "uploaded object");
        Ok(())
    }

    /// Delete every object under `prefix`, paging through the listing.
    pub async fn delete_prefix(&self, prefix: &str) -> Result<(), StorageError> {
        let mut continuation_token: Option<String> = None;

        loop {
            let listing = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| StorageError::Delete(DisplayErrorContext(&e).to_string()))?;

            let objects = listing.contents();
            if objects.is_empty() {
                break;
            }

            let identifiers: Vec<ObjectIdentifier> = objects
                .iter()
                .filter_map(|o| o.key())
                .map(|k| {
                    ObjectIdentifier::builder()
                        .key(k)
                        .build()
                        .map_err(|e| StorageError::Delete(e.to_string()))
                })
                .collect::<Result<_, _>>()?;

            let delete = Delete::builder()
                .set_objects(Some(identifiers))
                .build()
                .map_err(|e| StorageError::Delete(e.to_string()))?;

            self.client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| StorageError::Delete(DisplayErrorContext(&e).to_string()))?;

            continuation_token = if listing.is_truncated() == Some(true) {
                listing.next_continuation_token().map(String::from)
            } else {
                None
            };

            if continuation_token.is_none() {
                break;
            }
        }

        tracing::debug!(prefix, "deleted objects under prefix");
        Ok(())
    }

    /// A presigned GET URL for `key`, valid for 15 minutes.
    pub async fn presigned_download_url(&self, key: &str) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(PRESIGN_EXPIRY)
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Presign(DisplayErrorContext(&e).to_string()))?;

        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_key_joins_project_and_name() {
        assert_eq!(
            ObjectStorage::file_key(&"0192d3c4", "contract.pdf"),
            "0192d3c4/contract.pdf"
        );
    }

    #[test]
    fn max_file_size_is_five_megabytes() {
        assert_eq!(MAX_FILE_BYTES, 5 * 1024 * 1024);
    }
}
