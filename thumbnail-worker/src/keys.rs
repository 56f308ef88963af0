//! Destination-key derivation for derivatives
//!
//! Pure functions of the source key; never touch storage. Repeated
//! deliveries of the same notification therefore converge on the same
//! destination object instead of accumulating duplicates.

use thiserror::Error;

/// Result type alias for key derivation
pub type KeyResult<T> = Result<T, KeyError>;

/// Errors from destination-key derivation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Source key carries no file name (empty, or a directory marker
    /// ending in `/`); permanent, never retried
    #[error("source key has no file name: {0:?}")]
    EmptyFileName(String),
}

/// Computes the destination key for a resized derivative:
/// `thumbnails/<stem>_thumbnail.png`, where `<stem>` is the final path
/// segment truncated at its first `.`
///
/// # Errors
///
/// Returns `KeyError::EmptyFileName` for empty keys and directory markers
pub fn thumbnail_key(source_key: &str) -> KeyResult<String> {
    let name = file_name(source_key)?;
    let stem = name.split('.').next().unwrap_or(name);
    Ok(format!("thumbnails/{stem}_thumbnail.png"))
}

/// Computes the destination key for a pass-through copy:
/// `thumbnails/<file-name-with-extension>` (format preserving)
///
/// # Errors
///
/// Returns `KeyError::EmptyFileName` for empty keys and directory markers
pub fn copy_key(source_key: &str) -> KeyResult<String> {
    let name = file_name(source_key)?;
    Ok(format!("thumbnails/{name}"))
}

/// Final `/`-delimited segment of the key; the whole key when slashless
fn file_name(source_key: &str) -> KeyResult<&str> {
    let name = source_key.rsplit('/').next().unwrap_or(source_key);
    if name.is_empty() {
        return Err(KeyError::EmptyFileName(source_key.to_string()));
    }
    Ok(name)
}
