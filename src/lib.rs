//! mail-ingest — promotional-mail ingestion and classification service.
//!
//! Pulls message pages from the Gmail REST API, decodes each message's
//! MIME payload tree, scores it for promotional content, and fans the
//! results out to a DynamoDB header index and an S3 snapshot.

pub mod classify;
pub mod config;
pub mod error;
pub mod gmail;
pub mod http;
pub mod ingest;
pub mod model;
pub mod store;
pub mod token;
