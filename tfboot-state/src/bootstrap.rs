//! One-shot bootstrap against AWS

use crate::bucket::{Provisioned, S3ManagedBackend};
use crate::clients::{DynamoDbTables, S3Buckets, load_sdk_config};
use crate::config::BootstrapConfig;
use crate::error::BackendResult;

/// Provision the state bucket and lock table described by `config`
///
/// Calls are issued one after another; nothing runs concurrently.
pub async fn bootstrap(config: &BootstrapConfig) -> BackendResult<Provisioned> {
    let sdk_config = load_sdk_config(&config.region, config.endpoint_url.as_deref()).await;

    let tables = DynamoDbTables::from_sdk_config(&sdk_config);
    let buckets = S3Buckets::from_sdk_config(&sdk_config, config.endpoint_url.is_some());

    S3ManagedBackend::new(&buckets, &tables)
        .with_lock_table(config.lock_table.clone())
        .provision(
            &config.scope,
            &config.region,
            &config.bucket,
            &config.key,
            config.encrypt,
        )
        .await
}
