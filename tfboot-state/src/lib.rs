//! tfboot State Bootstrapping
//!
//! This crate provisions the AWS resources Terraform needs for S3 remote state
//! with locking: a versioned, tagged S3 bucket and a DynamoDB lock table.
//!
//! # Overview
//!
//! - **ensure_lock_table**: best-effort creation of the lock table
//! - **S3ManagedBackend**: creates and configures the state bucket, then
//!   produces the backend descriptor
//! - **LockTableApi / BucketApi**: the control-plane calls both rely on,
//!   implemented for the AWS SDK clients
//!
//! # Example
//!
//! ```ignore
//! use tfboot_state::{bootstrap, BackendConfig, BootstrapConfig};
//!
//! let config = BackendConfig::load("tfboot.json")?;
//! let config = BootstrapConfig::from_config(&config)?;
//!
//! let outcome = bootstrap(&config).await?;
//! println!("{}", outcome.descriptor.to_hcl());
//! ```

pub mod api;
pub mod bootstrap;
pub mod bucket;
pub mod clients;
pub mod config;
pub mod error;
pub mod lock_table;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use api::{BucketApi, CreateBucketRequest, CreateTableRequest, LockTableApi, VersioningRequest};
pub use bootstrap::bootstrap;
pub use bucket::{DEFAULT_REGION, Provisioned, S3ManagedBackend, location_constraint};
pub use config::{BackendConfig, BootstrapConfig};
pub use error::{BackendError, BackendResult, BestEffort};
pub use lock_table::{DEFAULT_LOCK_TABLE, ensure_lock_table};
