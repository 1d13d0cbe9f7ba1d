//! Gmail REST client — paginated id listing and full-message fetch.
//!
//! Every call attaches the current bearer credential from the injected
//! `TokenSource`. Nothing is cached and nothing is retried here; a
//! failure surfaces immediately to the orchestrator, which decides
//! whether it is fatal (id listing) or skippable (per-message fetch).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::classify::Classifier;
use crate::error::MailError;
use crate::gmail::payload::{self, Payload};
use crate::ingest::MailSource;
use crate::model::EmailMessage;
use crate::token::TokenSource;

/// The provider rejects page sizes above this; requests are clamped
/// before being issued.
pub const MAX_PAGE_SIZE: usize = 500;

const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

/// Gmail client over reqwest.
pub struct GmailClient {
    client: reqwest::Client,
    token_source: Arc<dyn TokenSource>,
    classifier: Classifier,
    api_base: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageRef {
    id: String,
    #[serde(default)]
    #[allow(dead_code)]
    thread_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessagesListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
    #[serde(default)]
    next_page_token: String,
}

/// Message envelope as returned by `format=full`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessage {
    pub id: String,
    #[serde(default)]
    pub payload: Payload,
}

impl GmailClient {
    pub fn new(token_source: Arc<dyn TokenSource>, classifier: Classifier) -> Self {
        Self {
            client: reqwest::Client::new(),
            token_source,
            classifier,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API base (local test servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token_source.access_token())
    }

    /// Convert a raw envelope into a classified domain message.
    pub fn parse_message(&self, raw: GmailMessage) -> EmailMessage {
        let headers = payload::extract_headers(&raw.payload);

        let mut email = EmailMessage {
            id: raw.id,
            subject: String::new(),
            from: String::new(),
            to: String::new(),
            date: Utc::now(),
            body: String::new(),
            headers,
            is_promotional: false,
        };

        for (name, value) in &email.headers {
            match name.to_lowercase().as_str() {
                "subject" => email.subject = value.clone(),
                "from" => email.from = value.clone(),
                "to" => email.to = value.clone(),
                "date" => email.date = parse_date(value),
                _ => {}
            }
        }

        email.body = payload::extract_body(&raw.payload);
        email.is_promotional = self.classifier.classify(&email);
        email
    }
}

/// Parse an email Date header, trying RFC 2822 then RFC 3339.
/// Unparseable dates fall back to the retrieval time.
fn parse_date(raw: &str) -> DateTime<Utc> {
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }
    Utc::now()
}

#[async_trait]
impl MailSource for GmailClient {
    async fn list_message_ids(
        &self,
        max_per_page: usize,
        page_token: &str,
    ) -> Result<(Vec<String>, String), MailError> {
        let url = format!("{}/users/me/messages", self.api_base);

        let mut query: Vec<(&str, String)> = vec![(
            "maxResults",
            max_per_page.min(MAX_PAGE_SIZE).to_string(),
        )];
        if !page_token.is_empty() {
            query.push(("pageToken", page_token.to_string()));
        }

        debug!(url = %url, page_token = %page_token, "Listing message ids");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(MailError::Protocol {
                status: status.as_u16(),
                body,
            });
        }

        let list: MessagesListResponse =
            serde_json::from_str(&body).map_err(|e| MailError::Decode(e.to_string()))?;

        let ids = list.messages.into_iter().map(|m| m.id).collect();
        Ok((ids, list.next_page_token))
    }

    async fn fetch_message(&self, id: &str) -> Result<EmailMessage, MailError> {
        let url = format!("{}/users/me/messages/{}", self.api_base, id);

        let response = self
            .client
            .get(&url)
            .query(&[("format", "full")])
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(MailError::Protocol {
                status: status.as_u16(),
                body,
            });
        }

        let raw: GmailMessage =
            serde_json::from_str(&body).map_err(|e| MailError::Decode(e.to_string()))?;

        Ok(self.parse_message(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use crate::gmail::payload::{Header, PayloadBody};
    use crate::token::StaticTokenSource;

    fn client() -> GmailClient {
        GmailClient::new(
            Arc::new(StaticTokenSource::new("test-token")),
            Classifier::default(),
        )
    }

    fn envelope(id: &str, headers: Vec<(&str, &str)>, body_text: &str) -> GmailMessage {
        GmailMessage {
            id: id.into(),
            payload: Payload {
                mime_type: "text/plain".into(),
                headers: headers
                    .into_iter()
                    .map(|(name, value)| Header {
                        name: name.into(),
                        value: value.into(),
                    })
                    .collect(),
                body: PayloadBody {
                    data: URL_SAFE_NO_PAD.encode(body_text),
                },
                parts: Vec::new(),
            },
        }
    }

    #[test]
    fn parse_message_maps_envelope_headers() {
        let raw = envelope(
            "m1",
            vec![
                ("Subject", "Hello"),
                ("From", "alice@example.com"),
                ("To", "bob@example.com"),
                ("Date", "Tue, 1 Jul 2025 10:30:00 +0200"),
                ("X-Custom", "kept"),
            ],
            "just a note",
        );
        let email = client().parse_message(raw);

        assert_eq!(email.id, "m1");
        assert_eq!(email.subject, "Hello");
        assert_eq!(email.from, "alice@example.com");
        assert_eq!(email.to, "bob@example.com");
        assert_eq!(email.body, "just a note");
        assert_eq!(email.headers["X-Custom"], "kept");
        assert_eq!(email.date.to_rfc3339(), "2025-07-01T08:30:00+00:00");
        assert!(!email.is_promotional);
    }

    #[test]
    fn parse_message_classifies_promotional_content() {
        let raw = envelope(
            "m2",
            vec![("Subject", "Flash sale"), ("From", "promo@store.com")],
            "50% off, unsubscribe below",
        );
        let email = client().parse_message(raw);
        assert!(email.is_promotional);
    }

    #[test]
    fn unparseable_date_falls_back_to_now() {
        let before = Utc::now();
        let raw = envelope("m3", vec![("Date", "not a date")], "x");
        let email = client().parse_message(raw);
        assert!(email.date >= before);
        assert!(email.date <= Utc::now());
    }

    #[test]
    fn parse_date_accepts_rfc3339() {
        let parsed = parse_date("2025-07-01T10:30:00Z");
        assert_eq!(parsed.to_rfc3339(), "2025-07-01T10:30:00+00:00");
    }

    #[test]
    fn list_response_tolerates_missing_fields() {
        // An exhausted mailbox returns neither `messages` nor `nextPageToken`.
        let parsed: MessagesListResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.messages.is_empty());
        assert!(parsed.next_page_token.is_empty());
    }

    #[test]
    fn list_response_parses_ids_in_order() {
        let parsed: MessagesListResponse = serde_json::from_str(
            r#"{"messages":[{"id":"a","threadId":"t1"},{"id":"b","threadId":"t2"}],"nextPageToken":"tok"}"#,
        )
        .unwrap();
        let ids: Vec<_> = parsed.messages.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(parsed.next_page_token, "tok");
    }
}
