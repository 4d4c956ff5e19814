//! S3 state bucket operations

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::types::{
    BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration, Tag, Tagging,
    VersioningConfiguration,
};
use tfboot_core::TagSet;

use super::{Page, collect_pages};
use crate::api::{self, BucketApi, CreateBucketRequest, VersioningRequest, VersioningStatus};
use crate::error::{BackendError, BackendResult};

/// S3-backed [`BucketApi`]
#[derive(Debug, Clone)]
pub struct S3Buckets {
    client: Client,
}

impl S3Buckets {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from shared configuration
    ///
    /// Path-style addressing is forced when an endpoint override is set, since
    /// local emulators rarely resolve virtual-hosted bucket names.
    pub fn from_sdk_config(config: &aws_config::SdkConfig, force_path_style: bool) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(config)
            .force_path_style(force_path_style)
            .build();
        Self::new(Client::from_conf(s3_config))
    }
}

#[async_trait]
impl BucketApi for S3Buckets {
    async fn list_buckets(&self) -> BackendResult<Vec<String>> {
        // Accounts above the default bucket quota must page through ListBuckets
        collect_pages(|continuation_token| {
            let client = &self.client;
            async move {
                let output = client
                    .list_buckets()
                    .set_continuation_token(continuation_token)
                    .send()
                    .await
                    .map_err(|e| BackendError::aws(format!("Failed to list buckets: {}", e)))?;

                Ok(Page {
                    names: output
                        .buckets()
                        .iter()
                        .filter_map(|b| b.name().map(str::to_string))
                        .collect(),
                    next: output.continuation_token().map(str::to_string),
                })
            }
        })
        .await
    }

    async fn create_bucket(&self, request: &CreateBucketRequest) -> BackendResult<()> {
        let mut create_request = self.client.create_bucket().bucket(&request.bucket);

        if let Some(region) = &request.location_constraint {
            let config = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region.as_str()))
                .build();
            create_request = create_request.create_bucket_configuration(config);
        }

        create_request
            .send()
            .await
            .map_err(|e| BackendError::BucketCreationFailed(e.to_string()))?;

        Ok(())
    }

    async fn put_bucket_tagging(&self, bucket: &str, tags: &TagSet) -> BackendResult<()> {
        let tag_set = tags
            .iter()
            .map(|tag| {
                Tag::builder()
                    .key(tag.key)
                    .value(tag.value)
                    .build()
                    .map_err(|e| BackendError::aws(e.to_string()))
            })
            .collect::<BackendResult<Vec<_>>>()?;

        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| BackendError::aws(e.to_string()))?;

        self.client
            .put_bucket_tagging()
            .bucket(bucket)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| BackendError::aws(format!("Failed to tag bucket: {}", e)))?;

        Ok(())
    }

    async fn put_bucket_versioning(
        &self,
        bucket: &str,
        versioning: &VersioningRequest,
    ) -> BackendResult<()> {
        let versioning_config = VersioningConfiguration::builder()
            .status(to_versioning_status(versioning.status))
            .mfa_delete(to_mfa_delete(versioning.mfa_delete))
            .build();

        self.client
            .put_bucket_versioning()
            .bucket(bucket)
            .versioning_configuration(versioning_config)
            .send()
            .await
            .map_err(|e| BackendError::aws(format!("Failed to enable versioning: {}", e)))?;

        Ok(())
    }
}

fn to_versioning_status(status: VersioningStatus) -> BucketVersioningStatus {
    match status {
        VersioningStatus::Enabled => BucketVersioningStatus::Enabled,
        VersioningStatus::Suspended => BucketVersioningStatus::Suspended,
    }
}

fn to_mfa_delete(mfa_delete: api::MfaDelete) -> aws_sdk_s3::types::MfaDelete {
    match mfa_delete {
        api::MfaDelete::Enabled => aws_sdk_s3::types::MfaDelete::Enabled,
        api::MfaDelete::Disabled => aws_sdk_s3::types::MfaDelete::Disabled,
    }
}
