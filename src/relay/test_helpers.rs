//! Shared test helpers for building relays with in-memory collaborators.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::audit::MemoryAuditSink;
use crate::config::{AuditConfig, Config, FetchConfig, MailConfig, StorageConfig};
use crate::error::{DeliveryError, StoreError};
use crate::mail::MailSender;
use crate::relay::SubmissionRelay;
use crate::storage::{MemoryObjectStore, ObjectAck, ObjectStore};
use crate::types::Delivery;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A mail that went through [`RecordingMailer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SentMail {
    pub recipient: String,
    pub body: String,
}

/// Mail sender that records every message and optionally refuses them
#[derive(Default)]
pub(crate) struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: bool,
}

impl RecordingMailer {
    pub(crate) fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, recipient: &str, body: &str) -> Result<Delivery, DeliveryError> {
        self.sent.lock().await.push(SentMail {
            recipient: recipient.to_string(),
            body: body.to_string(),
        });
        if self.fail {
            return Err(DeliveryError::Rejected {
                status: 401,
                body: "Forbidden".to_string(),
            });
        }
        Ok(Delivery {
            response: "Queued. Thank you.".to_string(),
            message_id: "<20240101.1@mg.example.edu>".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Object store whose every write fails in the given phase
pub(crate) struct FailingStore {
    pub phase: StoreError,
    pub calls: Mutex<u32>,
}

impl FailingStore {
    pub(crate) fn new(phase: StoreError) -> Self {
        Self {
            phase,
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn store(&self, path: &str, _data: &[u8]) -> Result<ObjectAck, StoreError> {
        *self.calls.lock().await += 1;
        Err(match &self.phase {
            StoreError::Connect(reason) => StoreError::Connect(reason.clone()),
            StoreError::Write { reason, .. } => StoreError::Write {
                path: path.to_string(),
                reason: reason.clone(),
            },
            StoreError::Close { reason, .. } => StoreError::Close {
                path: path.to_string(),
                reason: reason.clone(),
            },
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Configuration pointing at nothing real; collaborators are injected
pub(crate) fn test_config() -> Config {
    Config {
        fetch: FetchConfig {
            timeout: Duration::from_secs(5),
            ..FetchConfig::default()
        },
        storage: StorageConfig {
            bucket: "submissions".to_string(),
            credentials_json: "{}".to_string(),
            ..StorageConfig::default()
        },
        mail: MailConfig {
            domain: "mg.example.edu".to_string(),
            api_key: "key-123".to_string(),
            sender: "ta@example.edu".to_string(),
            subject: "Submission status".to_string(),
            ..MailConfig::default()
        },
        audit: AuditConfig {
            table: "mail-audit".to_string(),
        },
    }
}

/// Collaborators of a relay built by [`create_test_relay`]
pub(crate) struct TestRelay {
    pub relay: SubmissionRelay,
    pub mailer: Arc<RecordingMailer>,
    pub audit: Arc<MemoryAuditSink>,
}

/// Build a relay around `store` with a recording mailer and an in-memory audit sink
pub(crate) fn create_test_relay(store: Arc<dyn ObjectStore>, mailer: RecordingMailer) -> TestRelay {
    let mailer = Arc::new(mailer);
    let audit = Arc::new(MemoryAuditSink::new());
    let relay = SubmissionRelay::new(test_config(), store, mailer.clone(), audit.clone()).unwrap();
    TestRelay {
        relay,
        mailer,
        audit,
    }
}

/// Relay with a working in-memory store
pub(crate) fn create_memory_relay() -> (TestRelay, Arc<MemoryObjectStore>) {
    let store = Arc::new(MemoryObjectStore::new());
    (
        create_test_relay(store.clone(), RecordingMailer::default()),
        store,
    )
}

/// Submission message pointing at `url`
pub(crate) fn submission_message(url: &str) -> String {
    serde_json::json!({
        "SubmissionEmail": "student@example.edu",
        "SubmissionUrl": url,
        "SubmissionId": "S1",
        "AssignmentId": "A1",
        "UserId": "U1",
    })
    .to_string()
}
