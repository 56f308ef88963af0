//! Error types for object store operations

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::put_object::PutObjectError;
use thiserror::Error;

/// Result type alias for object store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error types for object store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Object does not exist at the requested key
    #[error("object not found: {bucket}/{key}")]
    NotFound {
        /// Bucket that was queried
        bucket: String,
        /// Key that was queried
        key: String,
    },

    /// Access to the bucket or key was denied
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Storage quota for the bucket is exhausted
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Upstream service or network fault (5xx, timeout, connection loss)
    #[error("upstream storage error: {0}")]
    Upstream(String),

    /// Get request failed without a more specific classification
    #[error("failed to get object: {0}")]
    GetObject(#[source] Box<SdkError<GetObjectError>>),

    /// Put request failed without a more specific classification
    #[error("failed to put object: {0}")]
    PutObject(#[source] Box<SdkError<PutObjectError>>),
}

impl StoreError {
    /// Whether the failure is a network/service fault that a later
    /// redelivery can reasonably expect to succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

/// Maps the service-level classes shared by all S3 operations; returns
/// `None` when the error needs an operation-specific variant.
fn classify<E>(error: &SdkError<E>) -> Option<StoreError>
where
    E: ProvideErrorMetadata,
{
    match error {
        SdkError::ServiceError(service_err) => {
            let status = service_err.raw().status().as_u16();
            let detail = service_err
                .err()
                .message()
                .map_or_else(|| format!("status {status}"), ToString::to_string);

            if status >= 500 {
                return Some(StoreError::Upstream(detail));
            }

            match service_err.err().code() {
                Some("AccessDenied") => Some(StoreError::AccessDenied(detail)),
                Some("QuotaExceeded") => Some(StoreError::QuotaExceeded(detail)),
                _ if status == 403 => Some(StoreError::AccessDenied(detail)),
                _ => None,
            }
        }
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            Some(StoreError::Upstream(error.to_string()))
        }
        _ => None,
    }
}

impl From<SdkError<GetObjectError>> for StoreError {
    fn from(error: SdkError<GetObjectError>) -> Self {
        classify(&error).unwrap_or_else(|| Self::GetObject(Box::new(error)))
    }
}

impl From<SdkError<PutObjectError>> for StoreError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        classify(&error).unwrap_or_else(|| Self::PutObject(Box::new(error)))
    }
}
