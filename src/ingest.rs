//! Ingestion pipeline: paginated retrieval, classification filtering,
//! and fan-out to the two persistence sinks.
//!
//! All inbound mail flows through one sequential call:
//! 1. `MailSource::list_message_ids()` — one provider page at a time
//! 2. `MailSource::fetch_message()` — per id, skip-on-failure
//! 3. promotional filter — discarded messages don't count toward the cap
//! 4. `HeaderStore::put_batch()` — header rows in chunks of 25, in order
//! 5. `BlobStore::put_snapshot()` — one full JSON document, last
//!
//! Headers are always written before the snapshot; a header failure
//! aborts the call before any snapshot exists without its index.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{MailError, Result, StoreError};
use crate::model::{EmailFilter, EmailList, EmailMessage, HeaderRow};

/// Hard ceiling the header store enforces per write call.
pub const HEADER_BATCH_SIZE: usize = 25;

/// Paginated access to the remote mail provider.
#[async_trait]
pub trait MailSource: Send + Sync {
    /// List one page of message identifiers. Returns the ids in provider
    /// order and the continuation cursor for the next page (empty when
    /// there are no further pages).
    async fn list_message_ids(
        &self,
        max_per_page: usize,
        page_token: &str,
    ) -> std::result::Result<(Vec<String>, String), MailError>;

    /// Fetch, decode, and classify a single message.
    async fn fetch_message(&self, id: &str) -> std::result::Result<EmailMessage, MailError>;
}

/// Accepts one batch of header index rows per call, at most
/// [`HEADER_BATCH_SIZE`] rows.
#[async_trait]
pub trait HeaderStore: Send + Sync {
    async fn put_batch(&self, rows: &[HeaderRow]) -> std::result::Result<(), StoreError>;
}

/// Accepts one full-snapshot write and returns the storage key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put_snapshot(&self, emails: &EmailList) -> std::result::Result<String, StoreError>;
}

/// Drives retrieval and sequences persistence.
pub struct IngestService {
    mail: Arc<dyn MailSource>,
    headers: Arc<dyn HeaderStore>,
    blobs: Arc<dyn BlobStore>,
}

impl IngestService {
    pub fn new(
        mail: Arc<dyn MailSource>,
        headers: Arc<dyn HeaderStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            mail,
            headers,
            blobs,
        }
    }

    /// Pull pages of ids, fetch and classify each message, and accumulate
    /// up to `filter.max_results` qualifying messages.
    ///
    /// A failure listing ids is fatal and returns no partial results. A
    /// failure fetching one message is logged and skipped — one malformed
    /// message must not abort the whole retrieval. The returned list
    /// always carries an empty continuation cursor: this call does not
    /// expose resumability across invocations.
    pub async fn retrieve(&self, filter: &EmailFilter) -> Result<EmailList> {
        let mut emails: Vec<EmailMessage> = Vec::new();
        let mut page_token = filter.page_token.clone();

        loop {
            let (ids, next_page_token) = self
                .mail
                .list_message_ids(filter.max_results, &page_token)
                .await?;

            debug!(count = ids.len(), "Got message ids from provider");

            for id in &ids {
                if emails.len() >= filter.max_results {
                    break;
                }

                let email = match self.mail.fetch_message(id).await {
                    Ok(email) => email,
                    Err(e) => {
                        warn!(id = %id, error = %e, "Skipping message that failed to fetch");
                        continue;
                    }
                };

                if filter.only_promotional && !email.is_promotional {
                    continue;
                }

                emails.push(email);
            }

            if next_page_token.is_empty() || emails.len() >= filter.max_results {
                break;
            }

            page_token = next_page_token;
        }

        info!(total = emails.len(), "Retrieval complete");
        Ok(EmailList::new(emails))
    }

    /// Top-level entry point: retrieve, index headers, write the snapshot.
    ///
    /// Returns the list together with the snapshot's storage key. A header
    /// write failure aborts before the snapshot is attempted; a snapshot
    /// failure after headers were written is a recoverable inconsistency
    /// the caller handles by re-invoking `ingest`.
    pub async fn ingest(&self, filter: &EmailFilter) -> Result<(EmailList, String)> {
        let emails = self.retrieve(filter).await?;

        self.write_headers(&emails).await?;

        let blob_key = self.blobs.put_snapshot(&emails).await?;
        info!(key = %blob_key, "Snapshot written");

        Ok((emails, blob_key))
    }

    /// Write every message's header rows in sequential batches of at most
    /// [`HEADER_BATCH_SIZE`]. A failure on any batch aborts the remaining
    /// batches and the enclosing ingest call.
    async fn write_headers(&self, emails: &EmailList) -> Result<()> {
        let written_at = Utc::now().to_rfc3339();

        let rows: Vec<HeaderRow> = emails
            .emails
            .iter()
            .flat_map(|email| {
                email.headers.iter().map(|(name, value)| HeaderRow {
                    email_id: email.id.clone(),
                    header_name: name.clone(),
                    header_value: value.clone(),
                    written_at: written_at.clone(),
                })
            })
            .collect();

        for batch in rows.chunks(HEADER_BATCH_SIZE) {
            self.headers.put_batch(batch).await?;
        }

        debug!(rows = rows.len(), "Header index written");
        Ok(())
    }
}
