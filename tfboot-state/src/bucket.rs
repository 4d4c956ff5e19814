//! S3 state bucket provisioning

use tfboot_core::{BACKEND_TAG_CATEGORY, S3BackendDescriptor, TagSource};

use crate::api::{BucketApi, CreateBucketRequest, LockTableApi, VersioningRequest};
use crate::error::{BackendResult, BestEffort};
use crate::lock_table::{DEFAULT_LOCK_TABLE, ensure_lock_table};

/// Region where S3 rejects an explicit location constraint
pub const DEFAULT_REGION: &str = "us-east-1";

/// Location constraint to send when creating a bucket in `region`
///
/// us-east-1 has a null LocationConstraint and rejects the parameter, so it
/// must be omitted there and included everywhere else.
pub fn location_constraint(region: &str) -> Option<String> {
    if region == DEFAULT_REGION {
        None
    } else {
        Some(region.to_string())
    }
}

/// S3 backend whose bucket and lock table are created on demand
pub struct S3ManagedBackend<'a, B: ?Sized, T: ?Sized> {
    buckets: &'a B,
    tables: &'a T,
    lock_table: String,
}

impl<'a, B, T> S3ManagedBackend<'a, B, T>
where
    B: BucketApi + ?Sized,
    T: LockTableApi + ?Sized,
{
    pub fn new(buckets: &'a B, tables: &'a T) -> Self {
        Self {
            buckets,
            tables,
            lock_table: DEFAULT_LOCK_TABLE.to_string(),
        }
    }

    /// Use a lock table other than `terraform-locks`
    pub fn with_lock_table(mut self, lock_table: impl Into<String>) -> Self {
        self.lock_table = lock_table.into();
        self
    }

    /// Ensure the bucket and lock table exist, then describe the backend
    ///
    /// An existing bucket is left untouched: tags and versioning are only
    /// applied right after creation. Lock table failures are tolerated and
    /// reported through [`Provisioned::lock_table`]; any bucket failure aborts.
    pub async fn provision<S>(
        &self,
        scope: &S,
        region: &str,
        bucket: &str,
        key: &str,
        encrypt: bool,
    ) -> BackendResult<Provisioned>
    where
        S: TagSource + ?Sized,
    {
        let lock_table = ensure_lock_table(self.tables, region, &self.lock_table).await;

        let existing = self.buckets.list_buckets().await?;
        let created = if existing.iter().any(|name| name == bucket) {
            log::info!("S3 bucket '{}' already exists.", bucket);
            false
        } else {
            self.create_bucket(scope, region, bucket).await?;
            true
        };

        let descriptor = S3BackendDescriptor {
            region: region.to_string(),
            bucket: bucket.to_string(),
            key: key.to_string(),
            encrypt,
            dynamodb_table: lock_table.value.clone(),
        };

        Ok(Provisioned {
            descriptor,
            bucket_created: created,
            lock_table,
        })
    }

    async fn create_bucket<S>(&self, scope: &S, region: &str, bucket: &str) -> BackendResult<()>
    where
        S: TagSource + ?Sized,
    {
        log::info!("Creating S3 bucket: {} in {}", bucket, region);
        self.buckets
            .create_bucket(&CreateBucketRequest {
                bucket: bucket.to_string(),
                location_constraint: location_constraint(region),
            })
            .await?;

        let tags = scope.tags(BACKEND_TAG_CATEGORY);
        log::debug!("Tagging S3 bucket '{}' with {} tag(s)", bucket, tags.len());
        self.buckets.put_bucket_tagging(bucket, &tags).await?;

        self.buckets
            .put_bucket_versioning(bucket, &VersioningRequest::enabled_without_mfa_delete())
            .await?;
        log::info!("Enabled versioning on S3 bucket '{}'", bucket);

        Ok(())
    }
}

/// Result of a successful provisioning run
#[derive(Debug)]
pub struct Provisioned {
    pub descriptor: S3BackendDescriptor,
    /// Whether the bucket was created during this run
    pub bucket_created: bool,
    /// Lock table name and any tolerated failure
    pub lock_table: BestEffort<String>,
}
