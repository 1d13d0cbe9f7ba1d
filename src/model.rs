//! Domain types for retrieved mail.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single retrieved message, immutable once constructed.
///
/// Built once per fetched raw message, classified once, then handed to
/// both persistence sinks unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Provider-assigned identifier, unique within the account.
    pub id: String,
    pub subject: String,
    pub from: String,
    pub to: String,
    /// Parsed Date header; falls back to retrieval time when unparseable.
    pub date: DateTime<Utc>,
    /// Best-effort extracted text or HTML body.
    pub body: String,
    /// Flattened top-level headers. Last occurrence wins on duplicates.
    pub headers: BTreeMap<String, String>,
    /// Derived by the classifier, never provider-supplied.
    pub is_promotional: bool,
}

/// An ordered page-accumulated list of messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailList {
    pub emails: Vec<EmailMessage>,
    /// Always cleared on the final result: the pipeline does not expose
    /// resumability across invocations.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_page_token: String,
    pub total_count: usize,
}

impl EmailList {
    pub fn new(emails: Vec<EmailMessage>) -> Self {
        let total_count = emails.len();
        Self {
            emails,
            next_page_token: String::new(),
            total_count,
        }
    }
}

/// Caller-supplied retrieval bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailFilter {
    /// Upper bound on accumulated, classified results (not page size).
    pub max_results: usize,
    /// Forwarded to the provider; unused by classification.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query: String,
    /// Continuation cursor to start from.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,
    pub only_promotional: bool,
}

impl Default for EmailFilter {
    fn default() -> Self {
        Self {
            max_results: 50,
            query: String::new(),
            page_token: String::new(),
            only_promotional: false,
        }
    }
}

/// One header index row, keyed by `(email_id, header_name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow {
    pub email_id: String,
    pub header_name: String,
    pub header_value: String,
    /// RFC 3339 write timestamp, shared by all rows of one ingest call.
    pub written_at: String,
}
