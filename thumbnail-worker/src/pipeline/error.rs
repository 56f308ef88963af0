//! Error types for the per-invocation pipeline

use object_store::StoreError;
use thiserror::Error;

use crate::keys::KeyError;
use crate::thumbnail::ThumbnailError;
use crate::trigger::TriggerError;

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error types for the per-invocation pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Envelope could not be normalized into object references
    #[error("failed to resolve event envelope: {0}")]
    Trigger(#[from] TriggerError),

    /// Storage read or write failed
    #[error("storage operation failed: {0}")]
    Store(#[from] StoreError),

    /// Transform failed
    #[error("transform failed: {0}")]
    Thumbnail(#[from] ThumbnailError),

    /// Destination key could not be derived from the source key
    #[error("key derivation failed: {0}")]
    Key(#[from] KeyError),

    /// Some references failed while their siblings were still attempted;
    /// surfaced so the trigger transport redelivers the envelope
    #[error("{failed} of {total} object references failed")]
    Partial {
        /// Number of references that failed at some stage
        failed: usize,
        /// Total number of references in the envelope
        total: usize,
    },
}
