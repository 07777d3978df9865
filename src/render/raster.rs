//! Straight-alpha RGBA8 drawing primitives on `image::RgbaImage`.
//!
//! Every primitive clips to the destination bounds; nothing here can fail.

use image::RgbaImage;

use crate::{foundation::core::Rgba8, geometry::rect::PixelRect, style::profile::Fill};

pub(crate) fn bounds(img: &RgbaImage) -> PixelRect {
    PixelRect::sized(img.width(), img.height())
}

fn put(img: &mut RgbaImage, x: u32, y: u32, color: Rgba8) {
    let px = img.get_pixel_mut(x, y);
    px.0 = color.over(px.0);
}

pub fn fill_rect(img: &mut RgbaImage, rect: PixelRect, color: Rgba8) {
    let Some(r) = rect.intersection(bounds(img)) else {
        return;
    };
    for y in r.y..r.bottom() {
        for x in r.x..r.right() {
            put(img, x, y, color);
        }
    }
}

/// Paint `fill` over `rect`, gradients running top to bottom across the rectangle's height.
pub fn fill_vertical(img: &mut RgbaImage, rect: PixelRect, fill: &Fill) {
    if let Fill::Solid(c) = fill {
        fill_rect(img, rect, *c);
        return;
    }
    let Some(clip) = rect.intersection(bounds(img)) else {
        return;
    };
    let span = rect.height.saturating_sub(1).max(1) as f32;
    for y in clip.y..clip.bottom() {
        let t = (y - rect.y) as f32 / span;
        let row = PixelRect::new(clip.x, y, clip.width, 1);
        fill_rect(img, row, fill.sample(t));
    }
}

/// Frame of `width` pixels drawn just inside `rect`.
pub fn stroke_inside(img: &mut RgbaImage, rect: PixelRect, width: u32, color: Rgba8) {
    if width == 0 || rect.is_empty() {
        return;
    }
    let w = width.min(rect.width.div_ceil(2)).min(rect.height.div_ceil(2));
    fill_rect(img, PixelRect::new(rect.x, rect.y, rect.width, w), color);
    fill_rect(
        img,
        PixelRect::new(rect.x, rect.bottom() - w, rect.width, w),
        color,
    );
    let inner_h = rect.height.saturating_sub(2 * w);
    fill_rect(img, PixelRect::new(rect.x, rect.y + w, w, inner_h), color);
    fill_rect(
        img,
        PixelRect::new(rect.right() - w, rect.y + w, w, inner_h),
        color,
    );
}

/// Frame of `width` pixels hugging `rect` from outside (clipped at the image origin).
pub fn stroke_outside(img: &mut RgbaImage, rect: PixelRect, width: u32, color: Rgba8) {
    if width == 0 {
        return;
    }
    let x0 = i64::from(rect.x) - i64::from(width);
    let y0 = i64::from(rect.y) - i64::from(width);
    let x1 = i64::from(rect.right()) + i64::from(width);
    let y1 = i64::from(rect.bottom()) + i64::from(width);
    for y in y0.max(0)..y1.min(i64::from(img.height())) {
        for x in x0.max(0)..x1.min(i64::from(img.width())) {
            let inside = x >= i64::from(rect.x)
                && x < i64::from(rect.right())
                && y >= i64::from(rect.y)
                && y < i64::from(rect.bottom());
            if !inside {
                put(img, x as u32, y as u32, color);
            }
        }
    }
}

/// Filled axis-aligned ellipse centered at `(cx, cy)`, pixel centers tested against the
/// implicit equation.
pub fn fill_ellipse(img: &mut RgbaImage, cx: f32, cy: f32, rx: f32, ry: f32, color: Rgba8) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let x0 = (cx - rx).floor().max(0.0) as u32;
    let y0 = (cy - ry).floor().max(0.0) as u32;
    let x1 = ((cx + rx).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((cy + ry).ceil().max(0.0) as u32).min(img.height());
    for y in y0..y1 {
        let dy = (y as f32 + 0.5 - cy) / ry;
        for x in x0..x1 {
            let dx = (x as f32 + 0.5 - cx) / rx;
            if dx * dx + dy * dy <= 1.0 {
                put(img, x, y, color);
            }
        }
    }
}

/// Source-over copy of `src` with its top-left at `(x, y)`, restricted to `clip`.
pub fn blit(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64, clip: PixelRect) {
    let Some(clip) = clip.intersection(bounds(dst)) else {
        return;
    };
    let sx0 = i64::from(clip.x).max(x);
    let sy0 = i64::from(clip.y).max(y);
    let sx1 = i64::from(clip.right()).min(x + i64::from(src.width()));
    let sy1 = i64::from(clip.bottom()).min(y + i64::from(src.height()));
    for dy in sy0..sy1 {
        for dx in sx0..sx1 {
            let s = src.get_pixel((dx - x) as u32, (dy - y) as u32).0;
            let d = dst.get_pixel_mut(dx as u32, dy as u32);
            d.0 = Rgba8::new(s[0], s[1], s[2], s[3]).over(d.0);
        }
    }
}

/// Paint `color` wherever `mask` is set; the mask's top-left lands at `(x, y)`.
pub fn paint_mask(img: &mut RgbaImage, mask: &Mask, x: i64, y: i64, color: Rgba8) {
    for my in 0..mask.height {
        let py = y + i64::from(my);
        if py < 0 || py >= i64::from(img.height()) {
            continue;
        }
        for mx in 0..mask.width {
            let px = x + i64::from(mx);
            if px < 0 || px >= i64::from(img.width()) || !mask.get(mx, my) {
                continue;
            }
            put(img, px as u32, py as u32, color);
        }
    }
}

/// One-bit coverage bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.index(x, y).is_some_and(|i| self.bits[i])
    }

    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        if let Some(i) = self.index(x, y) {
            self.bits[i] = on;
        }
    }

    pub fn count_set(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Nearest-neighbour rescale to `width`×`height`.
    pub fn scaled(&self, width: u32, height: u32) -> Self {
        let mut out = Self::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = (u64::from(y) * u64::from(self.height) / u64::from(height)) as u32;
            for x in 0..width {
                let sx = (u64::from(x) * u64::from(self.width) / u64::from(width)) as u32;
                if self.get(sx, sy) {
                    out.set(x, y, true);
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
