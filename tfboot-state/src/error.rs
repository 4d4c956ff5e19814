//! Error types for provisioning

use thiserror::Error;

/// Errors that can occur while provisioning the state backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Configuration error
    #[error("Backend configuration error: {0}")]
    Configuration(String),

    /// Failed to create bucket
    #[error("Failed to create bucket: {0}")]
    BucketCreationFailed(String),

    /// Failed to create the lock table
    #[error("Failed to create lock table: {0}")]
    TableCreationFailed(String),

    /// Network or I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BackendError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an AWS error
    pub fn aws(message: impl Into<String>) -> Self {
        Self::Aws(message.into())
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Outcome of a non-fatal operation
///
/// Always carries a value. `error` records a failure that was tolerated
/// rather than propagated.
#[derive(Debug)]
#[must_use]
pub struct BestEffort<T> {
    pub value: T,
    pub error: Option<BackendError>,
}

impl<T> BestEffort<T> {
    /// The operation succeeded
    pub fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    /// The operation failed but still produced `value`
    pub fn degraded(value: T, error: BackendError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    /// Whether a failure was tolerated
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
