//! Shared primitives: colors, the error taxonomy, and small integer math helpers.

/// Color type and blending.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
pub(crate) mod math;
