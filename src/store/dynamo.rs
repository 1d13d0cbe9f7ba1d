//! DynamoDB-backed header index.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use tracing::debug;

use crate::error::StoreError;
use crate::ingest::{HEADER_BATCH_SIZE, HeaderStore};
use crate::model::HeaderRow;

/// Header store writing `(email_id, header_name)` rows via
/// `BatchWriteItem`. The table enforces a 25-row ceiling per call, so
/// larger batches are rejected here rather than sent and bounced.
pub struct DynamoHeaderStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoHeaderStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    fn to_write_request(row: &HeaderRow) -> Result<WriteRequest, StoreError> {
        let put = PutRequest::builder()
            .item("email_id", AttributeValue::S(row.email_id.clone()))
            .item("header_name", AttributeValue::S(row.header_name.clone()))
            .item("header_value", AttributeValue::S(row.header_value.clone()))
            .item("timestamp", AttributeValue::S(row.written_at.clone()))
            .build()
            .map_err(|e| StoreError::Persistence {
                store: "dynamodb".into(),
                reason: e.to_string(),
            })?;
        Ok(WriteRequest::builder().put_request(put).build())
    }
}

#[async_trait]
impl HeaderStore for DynamoHeaderStore {
    async fn put_batch(&self, rows: &[HeaderRow]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        if rows.len() > HEADER_BATCH_SIZE {
            return Err(StoreError::BatchTooLarge {
                got: rows.len(),
                max: HEADER_BATCH_SIZE,
            });
        }

        let requests: Vec<WriteRequest> = rows
            .iter()
            .map(Self::to_write_request)
            .collect::<Result<_, _>>()?;

        self.client
            .batch_write_item()
            .request_items(self.table_name.clone(), requests)
            .send()
            .await
            .map_err(|e| StoreError::Persistence {
                store: "dynamodb".into(),
                reason: e.to_string(),
            })?;

        debug!(rows = rows.len(), table = %self.table_name, "Header batch written");
        Ok(())
    }
}
