//! Error types for envelope resolution

use thiserror::Error;

/// Result type alias for envelope resolution
pub type TriggerResult<T> = Result<T, TriggerError>;

/// Error types for envelope resolution
#[derive(Error, Debug)]
pub enum TriggerError {
    /// Envelope (or a wrapped message body) did not parse as the
    /// configured transport shape; permanent for this envelope
    #[error("malformed event envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),
}
