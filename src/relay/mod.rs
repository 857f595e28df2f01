//! The per-invocation pipeline
//!
//! One notification runs through the stages below exactly once, in order:
//!
//! ```text
//! received → downloading → uploading (skipped if the download failed)
//!          → notifying → auditing → done
//! ```
//!
//! No stage failure escapes [`SubmissionRelay::handle`]. Download and upload
//! failures pick the [`MailStatus`](crate::types::MailStatus), a delivery
//! failure is written to the audit record, and an audit failure is logged.
//! The caller always gets the serialized notification back, so the trigger
//! cannot tell a clean run from a partial one; the audit table can.

use crate::audit::{AuditSink, Auditor, DynamoAuditSink};
use crate::config::Config;
use crate::event::EventSource;
use crate::fetch::HttpFetcher;
use crate::mail::{MailSender, MailgunSender};
use crate::notify::{self, Notifier};
use crate::storage::{GcsObjectStore, ObjectStore};
use crate::types::{AuditRecord, PipelineOutcome, SubmissionEvent};
use std::sync::Arc;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Relays one submission per notification
///
/// Holds only immutable configuration and shareable clients, so a single
/// instance serves concurrent invocations.
#[derive(Clone)]
pub struct SubmissionRelay {
    config: Arc<Config>,
    fetcher: HttpFetcher,
    store: Arc<dyn ObjectStore>,
    notifier: Notifier,
    auditor: Auditor,
}

impl SubmissionRelay {
    /// Create a relay around explicit collaborators
    pub fn new(
        config: Config,
        store: Arc<dyn ObjectStore>,
        mailer: Arc<dyn MailSender>,
        audit: Arc<dyn AuditSink>,
    ) -> crate::Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            store,
            notifier: Notifier::new(mailer),
            auditor: Auditor::new(audit),
        })
    }

    /// Create a relay with the production clients: GCS, Mailgun and DynamoDB
    ///
    /// AWS credentials and region come from the default provider chain.
    pub async fn from_config(config: Config) -> crate::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;

        let store = Arc::new(GcsObjectStore::new(
            http.clone(),
            &config.storage,
            &config.fetch.expected_content_type,
        ));
        let mailer = Arc::new(MailgunSender::new(http, &config.mail));
        let audit = Arc::new(DynamoAuditSink::new(&aws_config, &config.audit.table));

        tracing::info!(
            bucket = %config.storage.bucket,
            table = %config.audit.table,
            "relay clients initialized"
        );
        Self::new(config, store, mailer, audit)
    }

    /// Run the pipeline for one notification
    ///
    /// Returns the serialized notification whatever happened along the way.
    /// Exactly one audit record is written per call.
    #[tracing::instrument(skip_all)]
    pub async fn handle<E>(&self, event: &E) -> String
    where
        E: EventSource + ?Sized,
    {
        let request_metadata = event.to_json().unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize notification");
            String::new()
        });
        tracing::info!(event = %request_metadata, "received event");

        let submission = match event.submission() {
            Ok(submission) => submission,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting notification");
                self.auditor
                    .record(AuditRecord::for_invalid_event(&e, &request_metadata))
                    .await;
                return request_metadata;
            }
        };

        let outcome = self.transfer(&submission).await;

        let body = notify::render(
            outcome.status,
            &submission,
            &self.config.storage_uri(&outcome.path),
        );
        tracing::info!(
            status = %outcome.status,
            error = ?outcome.error,
            "sending status email"
        );
        let delivery = self
            .notifier
            .deliver(&body, &submission.submission_email)
            .await;

        tracing::info!("writing audit record");
        self.auditor
            .record(AuditRecord::for_delivery(
                &delivery,
                outcome.status,
                &request_metadata,
            ))
            .await;

        request_metadata
    }

    /// Download the archive and, if that worked, store it
    #[tracing::instrument(
        skip(self, submission),
        fields(submission_id = %submission.submission_id, assignment_id = %submission.assignment_id)
    )]
    async fn transfer(&self, submission: &SubmissionEvent) -> PipelineOutcome {
        tracing::info!(url = %submission.submission_url, "downloading submission");
        let data = match self.fetcher.fetch(&submission.submission_url).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "download failed");
                return PipelineOutcome {
                    status: notify::classify(Some(&e), None),
                    path: String::new(),
                    error: Some(e.to_string()),
                };
            }
        };

        let path = submission.object_path();
        tracing::info!(path = %path, store = self.store.name(), "uploading submission");
        match self.store.store(&path, &data).await {
            Ok(ack) => {
                tracing::info!(path = %ack.path, bytes = ack.size, "submission stored");
                PipelineOutcome {
                    status: notify::classify(None, None),
                    path,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "upload failed");
                PipelineOutcome {
                    status: notify::classify(None, Some(&e)),
                    path,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
