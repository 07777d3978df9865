//! Input records and card/sheet geometry.

/// Character records and stat formatting.
pub mod record;
/// Card and sheet specifications.
pub mod spec;
