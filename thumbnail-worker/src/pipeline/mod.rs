//! Per-invocation orchestration: resolve, fetch, transform, upload
//!
//! References are processed independently and every one of them is
//! attempted: a failure in one reference never cancels its siblings.
//! The invocation reports an aggregate outcome so at-least-once
//! transports redeliver failed envelopes, while already-completed
//! references converge idempotently on redelivery.

mod error;

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use object_store::{ObjectRef, ObjectStore};
use serde_json::Value;
use tracing::{error, info};

use crate::keys;
use crate::thumbnail::Thumbnailer;
use crate::trigger::TriggerKind;

pub use error::{PipelineError, PipelineResult};

const PNG_CONTENT_TYPE: &str = "image/png";

/// Transform strategy applied to each fetched object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    /// Resample to the fixed thumbnail box and re-encode as PNG
    Thumbnail,
    /// Store the fetched bytes unchanged under the derivative prefix
    Copy,
}

/// Aggregate outcome of a successful invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationSummary {
    /// References that completed the fetch, transform, upload chain
    pub succeeded: usize,
}

/// Wires resolver, fetcher, transformer, and uploader per invocation
pub struct Pipeline<S> {
    store: Arc<S>,
    thumbnailer: Arc<Thumbnailer>,
    trigger: TriggerKind,
    transform: TransformMode,
    max_concurrency: usize,
}

impl<S: ObjectStore> Pipeline<S> {
    /// Creates a pipeline over an injected store handle
    ///
    /// `max_concurrency` bounds how many references are in flight at once
    /// within one invocation; 1 processes them strictly sequentially.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        trigger: TriggerKind,
        transform: TransformMode,
        max_concurrency: usize,
    ) -> Self {
        Self {
            store,
            thumbnailer: Arc::new(Thumbnailer::with_defaults()),
            trigger,
            transform,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Processes one raw event envelope end to end
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Trigger` when the envelope cannot be
    /// resolved at all, and `PipelineError::Partial` when one or more
    /// references failed; sibling references are attempted regardless
    pub async fn run(&self, payload: &Value) -> PipelineResult<InvocationSummary> {
        let references = self.trigger.resolve(payload)?;
        if references.is_empty() {
            info!("event envelope carried no object records");
            return Ok(InvocationSummary { succeeded: 0 });
        }

        let total = references.len();
        let outcomes: Vec<(ObjectRef, PipelineResult<String>)> = stream::iter(references)
            .map(|reference| self.process_with_outcome(reference))
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let mut failed = 0;
        for (reference, result) in &outcomes {
            match result {
                Ok(destination) => {
                    info!(source = %reference, destination = %destination, "stored derivative");
                }
                Err(e) => {
                    failed += 1;
                    error!(source = %reference, error = %e, "failed to process object");
                }
            }
        }

        if failed > 0 {
            return Err(PipelineError::Partial { failed, total });
        }

        Ok(InvocationSummary { succeeded: total })
    }

    async fn process_with_outcome(
        &self,
        reference: ObjectRef,
    ) -> (ObjectRef, PipelineResult<String>) {
        let result = self.process_reference(&reference).await;
        (reference, result)
    }

    /// Fetch, transform, derive key, upload; atomic per reference
    async fn process_reference(&self, reference: &ObjectRef) -> PipelineResult<String> {
        let content = self.store.get(reference).await?;

        let (body, derived_key, content_type) = match self.transform {
            TransformMode::Thumbnail => {
                let thumbnail = Arc::clone(&self.thumbnailer).generate_async(content).await?;
                (
                    thumbnail,
                    keys::thumbnail_key(&reference.key)?,
                    Some(PNG_CONTENT_TYPE),
                )
            }
            TransformMode::Copy => (content, keys::copy_key(&reference.key)?, None),
        };

        let destination = ObjectRef::new(reference.bucket.clone(), derived_key);
        self.store.put(&destination, body, content_type).await?;

        Ok(destination.key)
    }
}
