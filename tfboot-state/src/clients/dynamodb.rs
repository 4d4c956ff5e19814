//! DynamoDB lock table operations

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};

use super::{Page, collect_pages};
use crate::api::{self, AttributeType, CreateTableRequest, LockTableApi};
use crate::error::{BackendError, BackendResult};

/// DynamoDB-backed [`LockTableApi`]
#[derive(Debug, Clone)]
pub struct DynamoDbTables {
    client: Client,
}

impl DynamoDbTables {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl LockTableApi for DynamoDbTables {
    async fn list_tables(&self) -> BackendResult<Vec<String>> {
        // ListTables returns at most 100 names per page
        collect_pages(|start_table_name| {
            let client = &self.client;
            async move {
                let output = client
                    .list_tables()
                    .set_exclusive_start_table_name(start_table_name)
                    .send()
                    .await
                    .map_err(|e| BackendError::aws(format!("Failed to list tables: {}", e)))?;

                Ok(Page {
                    names: output.table_names().to_vec(),
                    next: output.last_evaluated_table_name().map(str::to_string),
                })
            }
        })
        .await
    }

    async fn create_table(&self, request: &CreateTableRequest) -> BackendResult<()> {
        let key_schema = KeySchemaElement::builder()
            .attribute_name(&request.hash_key.name)
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| BackendError::TableCreationFailed(e.to_string()))?;

        let attribute_definition = AttributeDefinition::builder()
            .attribute_name(&request.hash_key.name)
            .attribute_type(to_scalar_type(request.hash_key.attribute_type))
            .build()
            .map_err(|e| BackendError::TableCreationFailed(e.to_string()))?;

        self.client
            .create_table()
            .table_name(&request.table_name)
            .key_schema(key_schema)
            .attribute_definitions(attribute_definition)
            .billing_mode(to_billing_mode(request.billing_mode))
            .send()
            .await
            .map_err(|e| BackendError::TableCreationFailed(e.to_string()))?;

        Ok(())
    }
}

fn to_scalar_type(attribute_type: AttributeType) -> ScalarAttributeType {
    match attribute_type {
        AttributeType::String => ScalarAttributeType::S,
    }
}

fn to_billing_mode(billing_mode: api::BillingMode) -> BillingMode {
    match billing_mode {
        api::BillingMode::PayPerRequest => BillingMode::PayPerRequest,
    }
}
