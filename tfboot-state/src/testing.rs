//! Recording fakes for the control-plane traits

use std::sync::Mutex;

use async_trait::async_trait;
use tfboot_core::TagSet;

use crate::api::{
    BucketApi, CreateBucketRequest, CreateTableRequest, LockTableApi, VersioningRequest,
};
use crate::error::{BackendError, BackendResult};

/// In-memory table list that records CreateTable requests
#[derive(Default)]
pub struct FakeTables {
    tables: Mutex<Vec<String>>,
    created: Mutex<Vec<CreateTableRequest>>,
    fail_list: bool,
    fail_create: bool,
}

impl FakeTables {
    pub fn with_tables(names: &[&str]) -> Self {
        Self {
            tables: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn created(&self) -> Vec<CreateTableRequest> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl LockTableApi for FakeTables {
    async fn list_tables(&self) -> BackendResult<Vec<String>> {
        if self.fail_list {
            return Err(BackendError::aws("AccessDeniedException"));
        }
        Ok(self.tables.lock().unwrap().clone())
    }

    async fn create_table(&self, request: &CreateTableRequest) -> BackendResult<()> {
        self.created.lock().unwrap().push(request.clone());
        if self.fail_create {
            return Err(BackendError::TableCreationFailed(
                "ResourceInUseException".to_string(),
            ));
        }
        self.tables.lock().unwrap().push(request.table_name.clone());
        Ok(())
    }
}

/// A mutating call made against [`FakeBuckets`]
#[derive(Debug, Clone, PartialEq)]
pub enum BucketCall {
    Create(CreateBucketRequest),
    Tagging(String, TagSet),
    Versioning(String, VersioningRequest),
}

/// In-memory bucket list that records every mutating call in order
#[derive(Default)]
pub struct FakeBuckets {
    buckets: Mutex<Vec<String>>,
    calls: Mutex<Vec<BucketCall>>,
    fail_list: bool,
    fail_create: bool,
    fail_tagging: bool,
    fail_versioning: bool,
}

impl FakeBuckets {
    pub fn with_buckets(names: &[&str]) -> Self {
        Self {
            buckets: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_tagging(mut self) -> Self {
        self.fail_tagging = true;
        self
    }

    pub fn failing_versioning(mut self) -> Self {
        self.fail_versioning = true;
        self
    }

    pub fn calls(&self) -> Vec<BucketCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BucketApi for FakeBuckets {
    async fn list_buckets(&self) -> BackendResult<Vec<String>> {
        if self.fail_list {
            return Err(BackendError::aws("Failed to list buckets: AccessDenied"));
        }
        Ok(self.buckets.lock().unwrap().clone())
    }

    async fn create_bucket(&self, request: &CreateBucketRequest) -> BackendResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(BucketCall::Create(request.clone()));
        if self.fail_create {
            return Err(BackendError::BucketCreationFailed(
                "BucketAlreadyExists".to_string(),
            ));
        }
        self.buckets.lock().unwrap().push(request.bucket.clone());
        Ok(())
    }

    async fn put_bucket_tagging(&self, bucket: &str, tags: &TagSet) -> BackendResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(BucketCall::Tagging(bucket.to_string(), tags.clone()));
        if self.fail_tagging {
            return Err(BackendError::aws("Failed to tag bucket: InvalidTag"));
        }
        Ok(())
    }

    async fn put_bucket_versioning(
        &self,
        bucket: &str,
        versioning: &VersioningRequest,
    ) -> BackendResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(BucketCall::Versioning(bucket.to_string(), *versioning));
        if self.fail_versioning {
            return Err(BackendError::aws(
                "Failed to enable versioning: OperationAborted",
            ));
        }
        Ok(())
    }
}
