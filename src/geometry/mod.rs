//! Aspect-ratio math and integer rectangles. Pure functions, no logging.

/// Cover/contain fitting and proportional splits.
pub mod fit;
/// Integer pixel rectangles.
pub mod rect;
