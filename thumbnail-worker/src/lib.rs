//! Storage-event thumbnail worker
//!
//! Reacts to object-storage change notifications and writes a fixed-size
//! PNG derivative of each uploaded bitmap back into the same bucket under
//! a deterministic `thumbnails/` key.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

pub mod keys;
pub mod pipeline;
pub mod thumbnail;
pub mod trigger;
pub mod types;
