//! S3-backed snapshot storage.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use tracing::debug;

use crate::error::StoreError;
use crate::ingest::BlobStore;
use crate::model::EmailList;

/// Blob store writing one pretty-printed JSON snapshot per ingest call,
/// keyed `emails/emails_<UTC timestamp>.json`.
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket_name: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, bucket_name: impl Into<String>) -> Self {
        Self {
            client,
            bucket_name: bucket_name.into(),
        }
    }

    fn snapshot_key() -> String {
        format!("emails/emails_{}.json", Utc::now().format("%Y%m%d_%H%M%S"))
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put_snapshot(&self, emails: &EmailList) -> Result<String, StoreError> {
        let document =
            serde_json::to_vec_pretty(emails).map_err(|e| StoreError::Persistence {
                store: "s3".into(),
                reason: format!("failed to serialize snapshot: {e}"),
            })?;

        let key = Self::snapshot_key();

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .body(ByteStream::from(document))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| StoreError::Persistence {
                store: "s3".into(),
                reason: e.to_string(),
            })?;

        debug!(bucket = %self.bucket_name, key = %key, "Snapshot uploaded");
        Ok(key)
    }
}
