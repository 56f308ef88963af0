//! Environment-driven worker configuration
//!
//! Read once at process start; credential and region resolution is
//! delegated entirely to the AWS configuration loader.

use std::env;

use crate::pipeline::TransformMode;
use crate::trigger::TriggerKind;

/// Worker configuration resolved from the process environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    trigger: TriggerKind,
    transform: TransformMode,
    max_concurrency: usize,
}

impl Environment {
    /// Reads configuration from the process environment:
    ///
    /// * `TRIGGER_KIND`: `s3` | `sqs` | `sns` (default `sns`)
    /// * `TRANSFORM_MODE`: `thumbnail` | `copy` (default `thumbnail`)
    /// * `MAX_CONCURRENCY`: positive integer (default `1`, strictly
    ///   sequential per invocation)
    ///
    /// # Panics
    ///
    /// Panics if `TRIGGER_KIND` or `TRANSFORM_MODE` contains an invalid
    /// value
    #[must_use]
    pub fn from_env() -> Self {
        let trigger = match env::var("TRIGGER_KIND")
            .unwrap_or_else(|_| "sns".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "s3" => TriggerKind::S3,
            "sqs" => TriggerKind::Sqs,
            "sns" => TriggerKind::Sns,
            other => panic!("Invalid trigger kind: {other}"),
        };

        let transform = match env::var("TRANSFORM_MODE")
            .unwrap_or_else(|_| "thumbnail".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "thumbnail" => TransformMode::Thumbnail,
            "copy" => TransformMode::Copy,
            other => panic!("Invalid transform mode: {other}"),
        };

        let max_concurrency = env::var("MAX_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(1);

        Self {
            trigger,
            transform,
            max_concurrency,
        }
    }

    /// The trigger transport the worker decodes
    #[must_use]
    pub const fn trigger(&self) -> TriggerKind {
        self.trigger
    }

    /// The transform strategy applied to fetched objects
    #[must_use]
    pub const fn transform(&self) -> TransformMode {
        self.transform
    }

    /// Bound on in-flight references within one invocation
    #[must_use]
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}
