//! DynamoDB audit table

use super::AuditSink;
use crate::error::AuditError;
use crate::types::AuditRecord;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

/// [`AuditSink`] writing one `PutItem` per record
#[derive(Debug, Clone)]
pub struct DynamoAuditSink {
    client: aws_sdk_dynamodb::Client,
    table: String,
}

impl DynamoAuditSink {
    /// Create a sink from the shared AWS configuration
    pub fn new(aws_config: &aws_config::SdkConfig, table: &str) -> Self {
        Self::new_from_client(aws_sdk_dynamodb::Client::new(aws_config), table)
    }

    /// Create a sink around an existing client
    pub fn new_from_client(client: aws_sdk_dynamodb::Client, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }
}

/// Convert a record into its table item
pub(crate) fn to_item(record: &AuditRecord) -> Result<HashMap<String, AttributeValue>, AuditError> {
    serde_dynamo::to_item(record).map_err(|e| AuditError::Marshal(e.to_string()))
}

#[async_trait]
impl AuditSink for DynamoAuditSink {
    #[tracing::instrument(skip(self, record), fields(table = %self.table))]
    async fn put(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let item = to_item(record)?;

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| AuditError::Put {
                table: self.table.clone(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "dynamodb"
    }
}
