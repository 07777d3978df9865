//! CPU card rendering.
//!
//! `raster` holds the pixel operations, `text` the bitmap typeface, and `compositor` assembles
//! finished cards from both.

/// Card assembly.
pub mod compositor;
/// Pixel fills, strokes, blits and coverage masks.
pub mod raster;
/// Bitmap text measurement, fitting and drawing.
pub mod text;
