//! Notification fixtures and mock-service responses

use aws_lambda_events::sns::SnsEvent;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// RSA key of the test service account (PKCS#8 PEM)
pub const TEST_KEY_PEM: &str = include_str!("../fixtures/test_service_account.pem");

/// Submitter address used by every fixture message
pub const STUDENT_EMAIL: &str = "student@example.edu";

/// Object path the fixture submission lands at
pub const OBJECT_PATH: &str = "A1/U1/S1";

/// Archive bytes served by [`mount_archive`]
pub fn archive_bytes() -> Vec<u8> {
    let mut bytes = b"PK\x03\x04".to_vec();
    bytes.resize(200, 0);
    bytes
}

/// Submission message body pointing at `url`
pub fn submission_message(url: &str) -> String {
    submission_message_for("S1", url)
}

/// Submission message body with a specific submission id
pub fn submission_message_for(submission_id: &str, url: &str) -> String {
    serde_json::json!({
        "SubmissionEmail": STUDENT_EMAIL,
        "SubmissionUrl": url,
        "SubmissionId": submission_id,
        "AssignmentId": "A1",
        "UserId": "U1",
    })
    .to_string()
}

/// SNS delivery with one record per message
pub fn sns_event(messages: &[String]) -> SnsEvent {
    let records: Vec<_> = messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            serde_json::json!({
                "EventSource": "aws:sns",
                "EventVersion": "1.0",
                "EventSubscriptionArn": "arn:aws:sns:us-east-1:123456789012:submissions:0f4e",
                "Sns": {
                    "Type": "Notification",
                    "MessageId": format!("95df01b4-ee98-5cb9-9903-4c221d41eb{i:02}"),
                    "TopicArn": "arn:aws:sns:us-east-1:123456789012:submissions",
                    "Subject": null,
                    "Message": message,
                    "Timestamp": "2024-01-01T12:00:00.000Z",
                    "SignatureVersion": "1",
                    "Signature": "EXAMPLE",
                    "SigningCertUrl": "https://sns.us-east-1.amazonaws.com/cert.pem",
                    "UnsubscribeUrl": "https://sns.us-east-1.amazonaws.com/?Action=Unsubscribe",
                    "MessageAttributes": {}
                }
            })
        })
        .collect();
    serde_json::from_value(serde_json::json!({ "Records": records }))
        .expect("fixture SNS event must deserialize")
}

/// Serve `body` at `/{name}` with the given content type
pub async fn mount_file(server: &MockServer, name: &str, content_type: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/{name}")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", content_type)
                .set_body_bytes(body),
        )
        .mount(server)
        .await;
}

/// Serve [`archive_bytes`] at `/good.zip`
pub async fn mount_archive(server: &MockServer) {
    mount_file(server, "good.zip", "application/zip", archive_bytes()).await;
}
