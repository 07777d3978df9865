//! Aspect-ratio math shared by the portrait processor, compositor and sheet packer.
//!
//! Everything here is pure integer/float arithmetic; no bitmaps are touched.

use crate::geometry::rect::{Anchor, PixelRect};

/// Largest centered sub-rectangle of a `source_w`×`source_h` image whose aspect ratio matches
/// `target_w`×`target_h`, so that scaling it to the target covers it without letterboxing.
///
/// The result always lies inside the source. When the aspects already agree the full source is
/// returned; a source smaller than the target is fine (the caller upsamples). Degenerate targets
/// (a zero dimension) have no aspect to match and also yield the full source.
pub fn fit_cover(source_w: u32, source_h: u32, target_w: u32, target_h: u32) -> PixelRect {
    let full = PixelRect::sized(source_w, source_h);
    if source_w == 0 || source_h == 0 || target_w == 0 || target_h == 0 {
        return full;
    }

    let (sw, sh) = (u64::from(source_w), u64::from(source_h));
    let (tw, th) = (u64::from(target_w), u64::from(target_h));
    let source_wide = sw * th;
    let target_wide = sh * tw;

    if source_wide == target_wide {
        return full;
    }

    if source_wide > target_wide {
        // Source is wider than the target: keep full height, trim the sides.
        let crop_w = round_div(sh * tw, th).clamp(1, sw) as u32;
        PixelRect::new((source_w - crop_w) / 2, 0, crop_w, source_h)
    } else {
        // Source is taller: keep full width, trim top and bottom.
        let crop_h = round_div(sw * th, tw).clamp(1, sh) as u32;
        PixelRect::new(0, (source_h - crop_h) / 2, source_w, crop_h)
    }
}

/// Result of [`proportional_region`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionSplit {
    /// Band of height `ratio × container_h` attached to the anchor edge.
    pub region: PixelRect,
    /// What is left of the container.
    pub remainder: PixelRect,
}

/// Split a container into a band of `ratio × container_h` rows at the `anchor` edge and the
/// remaining rows. `ratio` is clamped to [0, 1]; non-finite ratios are treated as 0.
pub fn proportional_region(
    container_w: u32,
    container_h: u32,
    ratio: f64,
    anchor: Anchor,
) -> RegionSplit {
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let band_h = ((f64::from(container_h) * ratio).round() as u32).min(container_h);
    let rest_h = container_h - band_h;
    match anchor {
        Anchor::Top => RegionSplit {
            region: PixelRect::new(0, 0, container_w, band_h),
            remainder: PixelRect::new(0, band_h, container_w, rest_h),
        },
        Anchor::Bottom => RegionSplit {
            region: PixelRect::new(0, rest_h, container_w, band_h),
            remainder: PixelRect::new(0, 0, container_w, rest_h),
        },
    }
}

/// Uniform scale that makes a source cover the target (the larger of the two axis ratios).
pub fn cover_scale(source_w: u32, source_h: u32, target_w: u32, target_h: u32) -> f64 {
    let (sx, sy) = axis_scales(source_w, source_h, target_w, target_h);
    sx.max(sy)
}

/// Uniform scale that makes a source fit inside the target (the smaller of the two axis ratios).
pub fn contain_scale(source_w: u32, source_h: u32, target_w: u32, target_h: u32) -> f64 {
    let (sx, sy) = axis_scales(source_w, source_h, target_w, target_h);
    sx.min(sy)
}

/// Top-left origin that centers `width`×`height` content in `container`. Negative offsets mean
/// the content overhangs the container and must be clipped by the caller.
pub fn centered_origin(container: PixelRect, width: u32, height: u32) -> (i64, i64) {
    let dx = (i64::from(container.width) - i64::from(width)).div_euclid(2);
    let dy = (i64::from(container.height) - i64::from(height)).div_euclid(2);
    (i64::from(container.x) + dx, i64::from(container.y) + dy)
}

/// Centered placement of content that fits inside `container`; oversized content is pinned to
/// the container's top-left corner on the overflowing axis.
pub fn center_in(container: PixelRect, width: u32, height: u32) -> PixelRect {
    PixelRect::new(
        container.x + container.width.saturating_sub(width) / 2,
        container.y + container.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

fn axis_scales(source_w: u32, source_h: u32, target_w: u32, target_h: u32) -> (f64, f64) {
    if source_w == 0 || source_h == 0 {
        return (0.0, 0.0);
    }
    (
        f64::from(target_w) / f64::from(source_w),
        f64::from(target_h) / f64::from(source_h),
    )
}

fn round_div(num: u64, den: u64) -> u64 {
    let (num, den) = (u128::from(num), u128::from(den));
    ((num * 2 + den) / (den * 2)) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/fit.rs"]
mod tests;
