//! Inbound notifications
//!
//! The relay is triggered by an SNS topic subscription. Only the first record
//! of a delivery is processed; SNS delivers one record per Lambda invocation in
//! practice, and any extra records are logged and left untouched.

use crate::error::EventError;
use crate::types::SubmissionEvent;
use aws_lambda_events::sns::SnsEvent;

/// A received notification carrying a submission
pub trait EventSource {
    /// Body of the record the relay processes
    fn message(&self) -> Result<&str, EventError>;

    /// Number of records in the delivery
    fn record_count(&self) -> usize;

    /// Serialized copy of the whole notification, used for correlation
    fn to_json(&self) -> Result<String, serde_json::Error>;

    /// Parse the processed record into a [`SubmissionEvent`]
    fn submission(&self) -> Result<SubmissionEvent, EventError> {
        let count = self.record_count();
        if count > 1 {
            tracing::warn!(
                records = count,
                "notification carried several records, only the first is relayed"
            );
        }
        let submission: SubmissionEvent = serde_json::from_str(self.message()?)?;
        submission.validate()?;
        Ok(submission)
    }
}

impl EventSource for SnsEvent {
    fn message(&self) -> Result<&str, EventError> {
        self.records
            .first()
            .map(|record| record.sns.message.as_str())
            .ok_or(EventError::NoRecords)
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A bare submission message, outside of any transport envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage(pub String);

impl RawMessage {
    /// Wrap a message body
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }
}

impl EventSource for RawMessage {
    fn message(&self) -> Result<&str, EventError> {
        Ok(&self.0)
    }

    fn record_count(&self) -> usize {
        1
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        Ok(self.0.clone())
    }
}
