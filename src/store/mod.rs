//! Persistence sink adapters.
//!
//! The capability traits (`HeaderStore`, `BlobStore`) live in
//! `crate::ingest` next to the orchestrator that consumes them; this
//! module holds the AWS-backed production implementations plus the
//! shared client construction.

pub mod dynamo;
pub mod s3;

pub use dynamo::DynamoHeaderStore;
pub use s3::S3BlobStore;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::config::Credentials;

use crate::config::Config;

/// Load the shared AWS configuration.
///
/// With an endpoint override (LocalStack), static test credentials are
/// injected so no real credential chain is consulted.
pub async fn load_aws_config(config: &Config) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()));

    if let Some(endpoint) = &config.aws_endpoint_url {
        loader = loader
            .endpoint_url(endpoint)
            .credentials_provider(Credentials::from_keys("test-key", "test-secret", None));
    }

    loader.load().await
}

/// Build the DynamoDB-backed header store.
pub fn header_store(shared: &SdkConfig, config: &Config) -> DynamoHeaderStore {
    let client = aws_sdk_dynamodb::Client::new(shared);
    DynamoHeaderStore::new(client, config.headers_table.clone())
}

/// Build the S3-backed blob store. Path-style addressing is required by
/// LocalStack-style endpoints.
pub fn blob_store(shared: &SdkConfig, config: &Config) -> S3BlobStore {
    let s3_config = aws_sdk_s3::config::Builder::from(shared)
        .force_path_style(config.aws_endpoint_url.is_some())
        .build();
    let client = aws_sdk_s3::Client::from_conf(s3_config);
    S3BlobStore::new(client, config.bucket_name.clone())
}
