//! S3-backed object storage access for the thumbnail pipeline

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::debug;

pub use error::{StoreError, StoreResult};

/// Identifies one object within a storage namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Bucket holding the object
    pub bucket: String,
    /// Slash-delimited object key within the bucket
    pub key: String,
}

impl ObjectRef {
    /// Creates a new object reference
    #[must_use]
    pub const fn new(bucket: String, key: String) -> Self {
        Self { bucket, key }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Read/write access to an object storage namespace
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Reads the full content of the referenced object into memory
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the reference does not exist,
    /// `StoreError::AccessDenied` for permission failures, and
    /// `StoreError::Upstream` for service or network faults
    async fn get(&self, reference: &ObjectRef) -> StoreResult<Bytes>;

    /// Writes `body` at the destination reference, unconditionally
    /// overwriting any existing object (last writer wins)
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AccessDenied` for permission failures,
    /// `StoreError::QuotaExceeded` when the bucket quota is exhausted, and
    /// `StoreError::Upstream` for service or network faults
    async fn put(
        &self,
        reference: &ObjectRef,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<()>;
}

/// S3 implementation of [`ObjectStore`]
///
/// The client handle is constructed once at process start and shared; the
/// SDK-level retry configuration provides the bounded retry for transient
/// faults, so this layer performs a single attempt per call.
pub struct S3ObjectStore {
    client: Arc<S3Client>,
}

impl S3ObjectStore {
    /// Creates a store backed by a pre-configured S3 client
    #[must_use]
    pub const fn new(client: Arc<S3Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, reference: &ObjectRef) -> StoreResult<Bytes> {
        debug!(bucket = %reference.bucket, key = %reference.key, "fetching object");

        let response = self
            .client
            .get_object()
            .bucket(&reference.bucket)
            .key(&reference.key)
            .send()
            .await
            .map_err(|e| {
                if let SdkError::ServiceError(service_err) = &e {
                    if matches!(service_err.err(), GetObjectError::NoSuchKey(_)) {
                        return StoreError::NotFound {
                            bucket: reference.bucket.clone(),
                            key: reference.key.clone(),
                        };
                    }
                }
                StoreError::from(e)
            })?;

        // Fully materialize the body; the transform stage needs a seekable buffer.
        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Upstream(e.to_string()))?;

        Ok(body.into_bytes())
    }

    async fn put(
        &self,
        reference: &ObjectRef,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<()> {
        debug!(
            bucket = %reference.bucket,
            key = %reference.key,
            size = body.len(),
            "uploading object"
        );

        let mut request = self
            .client
            .put_object()
            .bucket(&reference.bucket)
            .key(&reference.key)
            .body(ByteStream::from(body));

        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(StoreError::from)?;

        Ok(())
    }
}
