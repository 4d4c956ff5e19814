//! Control-plane operations used for provisioning
//!
//! The provisioners only talk to these traits. The AWS SDK clients implement
//! them in [`crate::clients`]; tests use recording fakes.

use async_trait::async_trait;
use tfboot_core::TagSet;

use crate::error::BackendResult;

/// Hash key attribute of every Terraform lock table
pub const LOCK_TABLE_HASH_KEY: &str = "LockID";

/// DynamoDB scalar attribute types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
}

/// A key attribute definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// Billing mode for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
}

/// Parameters of a CreateTable call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableRequest {
    pub table_name: String,
    pub hash_key: KeyAttribute,
    pub billing_mode: BillingMode,
}

impl CreateTableRequest {
    /// Table layout Terraform expects for state locking
    pub fn lock_table(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            hash_key: KeyAttribute {
                name: LOCK_TABLE_HASH_KEY.to_string(),
                attribute_type: AttributeType::String,
            },
            billing_mode: BillingMode::PayPerRequest,
        }
    }
}

/// Parameters of a CreateBucket call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBucketRequest {
    pub bucket: String,
    /// `None` means the parameter is omitted from the request entirely
    pub location_constraint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersioningStatus {
    Enabled,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MfaDelete {
    Enabled,
    Disabled,
}

/// Parameters of a PutBucketVersioning call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersioningRequest {
    pub status: VersioningStatus,
    pub mfa_delete: MfaDelete,
}

impl VersioningRequest {
    pub fn enabled_without_mfa_delete() -> Self {
        Self {
            status: VersioningStatus::Enabled,
            mfa_delete: MfaDelete::Disabled,
        }
    }
}

/// Table operations needed for the lock table
#[async_trait]
pub trait LockTableApi: Send + Sync {
    /// Names of all tables in the client's region
    async fn list_tables(&self) -> BackendResult<Vec<String>>;

    /// Issue a CreateTable request; does not wait for the table to become active
    async fn create_table(&self, request: &CreateTableRequest) -> BackendResult<()>;
}

/// Bucket operations needed for the state bucket
#[async_trait]
pub trait BucketApi: Send + Sync {
    /// Names of all buckets owned by the caller
    async fn list_buckets(&self) -> BackendResult<Vec<String>>;

    async fn create_bucket(&self, request: &CreateBucketRequest) -> BackendResult<()>;

    /// Replace the bucket's tag set
    async fn put_bucket_tagging(&self, bucket: &str, tags: &TagSet) -> BackendResult<()>;

    async fn put_bucket_versioning(
        &self,
        bucket: &str,
        versioning: &VersioningRequest,
    ) -> BackendResult<()>;
}
