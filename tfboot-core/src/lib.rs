//! tfboot Core
//!
//! Pure data types shared by the provisioning crate and the CLI: attribute
//! values, tag sources and the Terraform backend descriptor.

pub mod backend;
pub mod resource;
pub mod tags;

pub use backend::{OutputFormat, S3BackendDescriptor};
pub use resource::Value;
pub use tags::{BACKEND_TAG_CATEGORY, Scope, Tag, TagError, TagSet, TagSource};
