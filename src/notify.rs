//! Outcome classification and the status email
//!
//! [`classify`] turns the download and upload results into a [`MailStatus`],
//! [`render`] produces the body mailed to the submitter, and [`Notifier`]
//! hands it to the configured [`MailSender`].

use crate::error::{DeliveryError, FetchError, StoreError};
use crate::mail::MailSender;
use crate::types::{Delivery, MailStatus, SubmissionEvent};
use std::sync::Arc;

/// Decide the status of a submission
///
/// A download failure wins over anything the upload step reports, since the
/// upload never runs in that case.
pub fn classify(download_err: Option<&FetchError>, upload_err: Option<&StoreError>) -> MailStatus {
    if download_err.is_some() {
        MailStatus::DownloadFailed
    } else if upload_err.is_some() {
        MailStatus::UploadFailed
    } else {
        MailStatus::Success
    }
}

/// Render the email body for `status`
///
/// `storage_uri` is the fully qualified location of the stored archive
/// (`gs://{bucket}/{path}`) and only appears in the success message.
pub fn render(status: MailStatus, event: &SubmissionEvent, storage_uri: &str) -> String {
    let assignment = &event.assignment_id;
    match status {
        MailStatus::Success => format!(
            "Hello,\n\nThis message is to inform you that your assignment with id {assignment} \
             has been successfully uploaded and no further action is needed.\n\n\
             The uploaded path is: {storage_uri}  \n\nThank you!"
        ),
        MailStatus::DownloadFailed => format!(
            "Hello,\n\nThis message is to inform you that your assignment with id {assignment} \
             has NOT been uploaded due to invalid link or file type. Please modify the submission \
             link or contact your TA for assistance to attempt and rectify the issue.\n\nThank you!"
        ),
        MailStatus::UploadFailed => format!(
            "Hello,\n\nThis message is to inform you that your assignment with id {assignment} \
             has failed to upload to GCP bucket. Please contact your TA for assistance to attempt \
             and rectify the issue.\n\nThank you!"
        ),
        MailStatus::InvalidEvent | MailStatus::Unknown(_) => format!(
            "Hello,\n\nThis message is to inform you that your assignment with id {assignment} \
             has NOT been uploaded. Please contact your TA for assistance to attempt and rectify \
             the issue.\n\nThank you!"
        ),
    }
}

/// Delivers status emails through a [`MailSender`]
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn MailSender>,
}

impl Notifier {
    /// Wrap a mail sender
    pub fn new(sender: Arc<dyn MailSender>) -> Self {
        Self { sender }
    }

    /// Send `message` to `recipient`
    ///
    /// Failures are logged and returned to the caller; nothing is retried.
    #[tracing::instrument(skip(self, message), fields(provider = self.sender.name()))]
    pub async fn deliver(&self, message: &str, recipient: &str) -> Result<Delivery, DeliveryError> {
        match self.sender.send(recipient, message).await {
            Ok(delivery) => {
                tracing::info!(message_id = %delivery.message_id, "status email accepted");
                Ok(delivery)
            }
            Err(e) => {
                tracing::warn!(error = %e, "status email failed");
                Err(e)
            }
        }
    }
}
