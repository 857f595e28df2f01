//! # submission-relay
//!
//! Relays student assignment archives from a submitted link into object
//! storage and tells the student how it went.
//!
//! ## Pipeline
//!
//! Each notification carries one submission. The relay:
//! - downloads the linked archive, accepting only `application/zip`
//! - stores it at `{AssignmentId}/{UserId}/{SubmissionId}` in the bucket
//! - mails the submitter a status message chosen from the outcome
//! - writes one audit record describing the delivery attempt
//!
//! Stage failures never escape [`SubmissionRelay::handle`]; they end up in the
//! status mail and the audit record instead.
//!
//! ## Quick Start
//!
//! ```no_run
//! use submission_relay::{Config, RawMessage, SubmissionRelay};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let relay = SubmissionRelay::from_config(config).await?;
//!
//!     let message = RawMessage::new(
//!         r#"{"SubmissionEmail":"student@example.edu","SubmissionUrl":"https://example.edu/hw1.zip","SubmissionId":"S1","AssignmentId":"A1","UserId":"U1"}"#,
//!     );
//!     let payload = relay.handle(&message).await;
//!     println!("{payload}");
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Audit trail of delivery attempts
pub mod audit;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Inbound notification envelopes
pub mod event;
/// Archive download
pub mod fetch;
/// Outbound mail providers
pub mod mail;
/// Status classification and message rendering
pub mod notify;
/// Per-invocation pipeline
pub mod relay;
/// Object storage backends
pub mod storage;
/// Core types
pub mod types;

// Re-export commonly used types
pub use audit::{AuditSink, DynamoAuditSink, MemoryAuditSink};
pub use config::{AuditConfig, Config, FetchConfig, MailConfig, StorageConfig};
pub use error::{AuditError, DeliveryError, Error, EventError, FetchError, Result, StoreError};
pub use event::{EventSource, RawMessage};
pub use fetch::HttpFetcher;
pub use mail::{MailSender, MailgunSender};
pub use relay::SubmissionRelay;
pub use storage::{GcsObjectStore, MemoryObjectStore, ObjectAck, ObjectStore};
pub use types::{AuditRecord, Delivery, MailStatus, SubmissionEvent};
