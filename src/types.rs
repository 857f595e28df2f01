//! Core types for submission-relay

use crate::error::EventError;
use serde::{Deserialize, Serialize};

/// A student submission as published on the notification topic
///
/// Fields that are absent from the message deserialize as empty strings,
/// matching what the upstream producer sends for unset values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SubmissionEvent {
    /// Address the status report is mailed to
    pub submission_email: String,
    /// Link to the submitted archive
    pub submission_url: String,
    /// Submission identifier
    pub submission_id: String,
    /// Assignment identifier
    pub assignment_id: String,
    /// Identifier of the submitting user
    pub user_id: String,
}

impl SubmissionEvent {
    /// Object key the archive is stored under: `{assignment}/{user}/{submission}`
    pub fn object_path(&self) -> String {
        format!(
            "{}/{}/{}",
            self.assignment_id, self.user_id, self.submission_id
        )
    }

    /// Reject events with an empty or blank field
    ///
    /// Every field feeds either the object key or the status email, so none
    /// can be left out.
    pub fn validate(&self) -> Result<(), EventError> {
        let fields = [
            ("SubmissionEmail", &self.submission_email),
            ("SubmissionUrl", &self.submission_url),
            ("SubmissionId", &self.submission_id),
            ("AssignmentId", &self.assignment_id),
            ("UserId", &self.user_id),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(EventError::MissingField(*name)),
            None => Ok(()),
        }
    }
}

/// Outcome classifier driving the status email and the audit record
///
/// Encoded as an integer in the audit table. Any code outside the known
/// values decodes to [`MailStatus::Unknown`] and keeps its raw value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum MailStatus {
    /// Archive downloaded and stored (1)
    Success,
    /// Link unreachable or not an archive (-1)
    DownloadFailed,
    /// Archive downloaded but the store rejected it (-2)
    UploadFailed,
    /// Inbound message could not be parsed; nothing was mailed (-3)
    InvalidEvent,
    /// Any other code
    Unknown(i32),
}

impl MailStatus {
    /// Convert integer status code to MailStatus enum
    pub fn from_i32(code: i32) -> Self {
        match code {
            1 => MailStatus::Success,
            -1 => MailStatus::DownloadFailed,
            -2 => MailStatus::UploadFailed,
            -3 => MailStatus::InvalidEvent,
            other => MailStatus::Unknown(other),
        }
    }

    /// Convert MailStatus enum to integer status code
    pub fn to_i32(&self) -> i32 {
        match self {
            MailStatus::Success => 1,
            MailStatus::DownloadFailed => -1,
            MailStatus::UploadFailed => -2,
            MailStatus::InvalidEvent => -3,
            MailStatus::Unknown(code) => *code,
        }
    }
}

impl From<i32> for MailStatus {
    fn from(code: i32) -> Self {
        Self::from_i32(code)
    }
}

impl From<MailStatus> for i32 {
    fn from(status: MailStatus) -> Self {
        status.to_i32()
    }
}

impl std::fmt::Display for MailStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_i32())
    }
}

/// Result of the download and upload steps for one invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Classified status
    pub status: MailStatus,
    /// Object key the archive was written to (empty if the upload never ran)
    pub path: String,
    /// Text of the error that decided the status, if any
    pub error: Option<String>,
}

/// Provider answer for an accepted status email
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Raw response text from the provider (e.g. "Queued. Thank you.")
    pub response: String,
    /// Provider-assigned message id
    pub message_id: String,
}

/// The one row written to the audit table per invocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuditRecord {
    /// Provider message id (empty when delivery failed)
    pub message_id: String,
    /// Provider response text
    pub response: String,
    /// Delivery error text (empty when the mail went out)
    pub error: String,
    /// Serialized copy of the inbound notification
    pub request_metadata: String,
    /// Whether the status email was accepted by the provider
    pub is_mail_sent: bool,
    /// Integer status code
    pub mail_status: MailStatus,
}
