//! Audit trail of relay invocations
//!
//! Every invocation ends with exactly one [`AuditRecord`] handed to an
//! [`AuditSink`]. Records are only ever put: never read back, updated or
//! deduplicated, so a redelivered notification produces a second row.

mod dynamo;
mod memory;

pub use dynamo::DynamoAuditSink;
pub use memory::MemoryAuditSink;

use crate::error::{AuditError, DeliveryError, EventError};
use crate::types::{AuditRecord, Delivery, MailStatus};
use async_trait::async_trait;
use std::sync::Arc;

/// Durable key-value table receiving audit records
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Write one record with a single put
    async fn put(&self, record: &AuditRecord) -> Result<(), AuditError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

impl AuditRecord {
    /// Record for an invocation that reached the status email
    pub fn for_delivery(
        delivery: &Result<Delivery, DeliveryError>,
        status: MailStatus,
        request_metadata: &str,
    ) -> Self {
        let (response, message_id, error) = match delivery {
            Ok(d) => (d.response.clone(), d.message_id.clone(), String::new()),
            Err(e) => (String::new(), String::new(), e.to_string()),
        };
        Self {
            message_id,
            response,
            error,
            request_metadata: request_metadata.to_string(),
            is_mail_sent: delivery.is_ok(),
            mail_status: status,
        }
    }

    /// Record for a notification whose message could not be read
    pub fn for_invalid_event(err: &EventError, request_metadata: &str) -> Self {
        Self {
            message_id: String::new(),
            response: String::new(),
            error: err.to_string(),
            request_metadata: request_metadata.to_string(),
            is_mail_sent: false,
            mail_status: MailStatus::InvalidEvent,
        }
    }
}

/// Best-effort writer in front of an [`AuditSink`]
#[derive(Clone)]
pub struct Auditor {
    sink: Arc<dyn AuditSink>,
}

impl Auditor {
    /// Wrap an audit sink
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Write `record`; failures are logged and swallowed
    #[tracing::instrument(
        skip(self, record),
        fields(sink = self.sink.name(), mail_status = %record.mail_status)
    )]
    pub async fn record(&self, record: AuditRecord) {
        match self.sink.put(&record).await {
            Ok(()) => tracing::debug!("audit record written"),
            Err(e) => tracing::error!(error = %e, "failed to write audit record"),
        }
    }
}
