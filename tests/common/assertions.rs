//! Assertions over audit records and mocked service traffic

use submission_relay::{AuditRecord, MailStatus};
use wiremock::MockServer;
use wiremock::http::Method;

/// Assert a single audit record was written and return it
pub fn single_record(records: &[AuditRecord]) -> &AuditRecord {
    assert_eq!(
        records.len(),
        1,
        "expected exactly one audit record, got {records:#?}"
    );
    &records[0]
}

/// Assert the record describes a delivered mail with the given status
pub fn assert_delivered(record: &AuditRecord, status: MailStatus) {
    assert!(record.is_mail_sent, "mail should be sent: {record:#?}");
    assert!(record.error.is_empty(), "unexpected error: {}", record.error);
    assert!(!record.message_id.is_empty(), "message id missing");
    assert_eq!(record.mail_status, status);
}

/// Number of requests `server` received with the given method and path
pub async fn request_count(server: &MockServer, method: Method, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method == method && r.url.path() == path)
        .count()
}

/// Form fields of the single Mailgun message `server` received
pub async fn sent_mail_fields(server: &MockServer) -> Vec<(String, String)> {
    let requests = server.received_requests().await.unwrap_or_default();
    let messages: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path().ends_with("/messages"))
        .collect();
    assert_eq!(messages.len(), 1, "expected exactly one mail request");

    url::form_urlencoded::parse(&messages[0].body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Value of form field `name`
pub fn field<'a>(fields: &'a [(String, String)], name: &str) -> &'a str {
    fields
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .unwrap_or_else(|| panic!("form field {name} missing"))
}

/// JSON bodies of every DynamoDB `PutItem` call `server` received
pub async fn put_item_bodies(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| {
            r.headers
                .get("x-amz-target")
                .is_some_and(|v| v.as_bytes() == b"DynamoDB_20120810.PutItem")
        })
        .map(|r| serde_json::from_slice(&r.body).expect("PutItem body must be JSON"))
        .collect()
}
