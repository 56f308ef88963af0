//! Bitmap decode, resample, and PNG re-encode
//!
//! The source format is inferred from the content's header bytes, never
//! from the key suffix. Output is always exactly the configured box size:
//! the source is scaled to cover the box and the excess is center-cropped.

use std::io::Cursor;
use std::sync::Arc;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{GenericImageView, ImageOutputFormat};
use thiserror::Error;
use tracing::debug;

/// Result type alias for thumbnail generation
pub type ThumbnailResult<T> = Result<T, ThumbnailError>;

/// Error types for thumbnail generation
#[derive(Error, Debug)]
pub enum ThumbnailError {
    /// Input is not a valid or supported bitmap; permanent
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// Re-encoding the resampled bitmap failed; permanent, never retried
    #[error("failed to encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),

    /// The blocking transform task was cancelled or panicked
    #[error("thumbnail task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Fixed geometry for derivatives; process-wide, never derived from input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSpec {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
}

impl ThumbnailSpec {
    /// The default 80x80 box
    pub const DEFAULT: Self = Self {
        width: 80,
        height: 80,
    };
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Turns arbitrary bitmaps into fixed-size PNG thumbnails
pub struct Thumbnailer {
    spec: ThumbnailSpec,
}

impl Thumbnailer {
    /// Creates a thumbnailer for the given box
    #[must_use]
    pub const fn new(spec: ThumbnailSpec) -> Self {
        Self { spec }
    }

    /// Creates a thumbnailer for the default 80x80 box
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self::new(ThumbnailSpec::DEFAULT)
    }

    /// Decodes, resamples to the spec box with Lanczos filtering, and
    /// re-encodes as PNG regardless of the source format
    ///
    /// CPU-intensive; call [`Self::generate_async`] from async code.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailError::Decode` for unsupported or corrupt input
    /// and `ThumbnailError::Encode` when PNG serialization fails
    pub fn generate(&self, original: &[u8]) -> ThumbnailResult<Bytes> {
        let img = image::load_from_memory(original).map_err(ThumbnailError::Decode)?;

        debug!(
            source_width = img.width(),
            source_height = img.height(),
            "decoded source image"
        );

        let resized = img.resize_to_fill(self.spec.width, self.spec.height, FilterType::Lanczos3);

        let mut buf = Vec::new();
        resized
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .map_err(ThumbnailError::Encode)?;

        Ok(Bytes::from(buf))
    }

    /// Runs [`Self::generate`] on the blocking thread pool so the async
    /// runtime is not stalled by pixel work
    ///
    /// # Errors
    ///
    /// As [`Self::generate`], plus `ThumbnailError::Task` if the blocking
    /// task is cancelled or panics
    pub async fn generate_async(self: Arc<Self>, original: Bytes) -> ThumbnailResult<Bytes> {
        tokio::task::spawn_blocking(move || self.generate(&original)).await?
    }
}
