//! DynamoDB lock table provisioning

use crate::api::{CreateTableRequest, LockTableApi};
use crate::error::{BackendResult, BestEffort};

/// Table name used when none is configured
pub const DEFAULT_LOCK_TABLE: &str = "terraform-locks";

/// Ensure the lock table exists, creating it if it is missing
///
/// This is best-effort: failures while listing or creating are logged and
/// recorded in the returned [`BestEffort`], but the table name is returned
/// either way. The call does not wait for a new table to become active.
pub async fn ensure_lock_table<T>(
    tables: &T,
    region: &str,
    table_name: &str,
) -> BestEffort<String>
where
    T: LockTableApi + ?Sized,
{
    match try_ensure_lock_table(tables, region, table_name).await {
        Ok(()) => BestEffort::ok(table_name.to_string()),
        Err(e) => {
            log::warn!("Error checking/creating DynamoDB table: {}", e);
            BestEffort::degraded(table_name.to_string(), e)
        }
    }
}

async fn try_ensure_lock_table<T>(
    tables: &T,
    region: &str,
    table_name: &str,
) -> BackendResult<()>
where
    T: LockTableApi + ?Sized,
{
    let existing = tables.list_tables().await?;

    if existing.iter().any(|name| name == table_name) {
        log::info!("DynamoDB table '{}' already exists.", table_name);
        return Ok(());
    }

    log::info!("Creating DynamoDB table: {} in {}", table_name, region);
    tables
        .create_table(&CreateTableRequest::lock_table(table_name))
        .await
}
