//! Filesystem collaborators: JSON configuration and bitmap writers.

/// Generator configuration and record loading.
pub mod config;
/// PNG/JPEG writers.
pub mod writer;
