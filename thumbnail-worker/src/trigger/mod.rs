//! Normalizes heterogeneous trigger envelopes into object references

mod error;
mod types;

use object_store::ObjectRef;
use serde::Deserialize;
use serde_json::Value;

pub use error::{TriggerError, TriggerResult};
use types::{S3Event, SnsEnvelope, SqsEnvelope};

/// Trigger transport the worker is wired to
///
/// Selects how a raw event payload is decoded before expansion; the
/// expansion itself is identical for all transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Direct storage notification
    S3,
    /// Queue-wrapped: each message body is a serialized storage notification
    Sqs,
    /// Pub/sub-wrapped: one indirection deeper than the queue shape
    Sns,
}

impl TriggerKind {
    /// Expands one raw event envelope into object references, preserving
    /// record order. An envelope carrying zero records yields an empty
    /// vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns `TriggerError::MalformedEnvelope` when the payload, or a
    /// wrapped message body, fails to parse as the expected shape
    pub fn resolve(self, payload: &Value) -> TriggerResult<Vec<ObjectRef>> {
        match self {
            Self::S3 => Ok(expand(S3Event::deserialize(payload)?)),
            Self::Sqs => {
                let envelope = SqsEnvelope::deserialize(payload)?;
                let mut references = Vec::new();
                for record in envelope.records {
                    references.extend(expand(serde_json::from_str(&record.body)?));
                }
                Ok(references)
            }
            Self::Sns => {
                let envelope = SnsEnvelope::deserialize(payload)?;
                let mut references = Vec::new();
                for record in envelope.records {
                    references.extend(expand(serde_json::from_str(&record.sns.message)?));
                }
                Ok(references)
            }
        }
    }
}

/// Maps each inner record 1:1 onto an object reference
fn expand(event: S3Event) -> Vec<ObjectRef> {
    event
        .records
        .into_iter()
        .map(|record| ObjectRef::new(record.s3.bucket.name, record.s3.object.key))
        .collect()
}
