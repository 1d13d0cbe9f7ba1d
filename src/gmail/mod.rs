//! Gmail provider adapter: REST client and payload decoding.

pub mod client;
pub mod payload;

pub use client::{GmailClient, GmailMessage, MAX_PAGE_SIZE};
pub use payload::{Header, Payload, PayloadBody};
