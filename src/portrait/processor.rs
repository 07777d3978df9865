use image::{RgbaImage, imageops::FilterType};

use crate::{
    assets::decode::{ImageFormatHint, PortraitLimits, decode_portrait, flatten_onto},
    foundation::{
        core::Rgba8,
        error::{CardError, CardResult},
    },
    geometry::{fit::fit_cover, rect::PixelRect},
    render::{
        raster::{fill_ellipse, fill_rect, stroke_inside},
        text::{MIN_FONT_PX, Typeface, draw_text, measure},
    },
};

/// Encoded portrait bytes plus the hint the fetcher had about their format.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortraitSource {
    pub bytes: Vec<u8>,
    pub hint: ImageFormatHint,
}

impl PortraitSource {
    pub fn new(bytes: Vec<u8>, hint: ImageFormatHint) -> Self {
        Self { bytes, hint }
    }
}

/// Portrait bitmap cropped and resampled to the exact art size of a card.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalArt {
    pub image: RgbaImage,
    /// `true` when the bitmap was synthesized rather than taken from portrait data.
    pub is_placeholder: bool,
}

impl CanonicalArt {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

const PLACEHOLDER_LABEL: &str = "NO IMAGE";
const PLACEHOLDER_BG: Rgba8 = Rgba8::rgb(0xD6, 0xD6, 0xDB);
const PLACEHOLDER_STRIPE: Rgba8 = Rgba8::rgb(0xCC, 0xCC, 0xD2);
const PLACEHOLDER_FIGURE: Rgba8 = Rgba8::rgb(0x9A, 0x9A, 0xA4);
const PLACEHOLDER_INK: Rgba8 = Rgba8::rgb(0x6E, 0x6E, 0x78);

/// Turns raw portrait bytes into [`CanonicalArt`].
///
/// The processor never substitutes a placeholder for bad input on its own; callers that want
/// that fallback catch [`CardError::InvalidImage`] and call [`PortraitProcessor::placeholder`].
#[derive(Clone, Debug)]
pub struct PortraitProcessor {
    limits: PortraitLimits,
    filter: FilterType,
    matte: [u8; 3],
}

impl Default for PortraitProcessor {
    fn default() -> Self {
        Self::new(PortraitLimits::default())
    }
}

impl PortraitProcessor {
    pub fn new(limits: PortraitLimits) -> Self {
        Self {
            limits,
            filter: FilterType::Lanczos3,
            matte: [255, 255, 255],
        }
    }

    pub fn limits(&self) -> &PortraitLimits {
        &self.limits
    }

    /// Canonical art for `source`, or a placeholder when there is none.
    pub fn process(
        &self,
        source: Option<&PortraitSource>,
        target_w: u32,
        target_h: u32,
    ) -> CardResult<CanonicalArt> {
        match source {
            Some(src) => self.process_bytes(&src.bytes, &src.hint, target_w, target_h),
            None => Ok(self.placeholder(target_w, target_h)),
        }
    }

    pub fn process_bytes(
        &self,
        bytes: &[u8],
        hint: &ImageFormatHint,
        target_w: u32,
        target_h: u32,
    ) -> CardResult<CanonicalArt> {
        let image = decode_portrait(bytes, hint)?;
        self.process_image(image, target_w, target_h)
    }

    /// Crop an already decoded bitmap to the target aspect and resample it to the target size.
    pub fn process_image(
        &self,
        mut image: RgbaImage,
        target_w: u32,
        target_h: u32,
    ) -> CardResult<CanonicalArt> {
        if target_w == 0 || target_h == 0 {
            return Err(CardError::validation(format!(
                "art target must be non-empty, got {target_w}x{target_h}"
            )));
        }
        let (w, h) = image.dimensions();
        self.limits.check(w, h)?;
        flatten_onto(&mut image, self.matte);

        let crop = fit_cover(w, h, target_w, target_h);
        let cropped = if crop == PixelRect::sized(w, h) {
            image
        } else {
            image::imageops::crop_imm(&image, crop.x, crop.y, crop.width, crop.height).to_image()
        };

        let image = if cropped.dimensions() == (target_w, target_h) {
            cropped
        } else {
            image::imageops::resize(&cropped, target_w, target_h, self.filter)
        };

        Ok(CanonicalArt {
            image,
            is_placeholder: false,
        })
    }

    /// Neutral stand-in art: a striped backdrop, a head-and-shoulders silhouette and a label.
    /// Never fails; a zero target yields an empty bitmap.
    pub fn placeholder(&self, target_w: u32, target_h: u32) -> CanonicalArt {
        let mut image = RgbaImage::from_pixel(target_w, target_h, PLACEHOLDER_BG.to_pixel());
        if target_w == 0 || target_h == 0 {
            return CanonicalArt {
                image,
                is_placeholder: true,
            };
        }

        let stripe = (target_w.min(target_h) / 16).max(2);
        let mut y = 0;
        while y < target_h {
            fill_rect(
                &mut image,
                PixelRect::new(0, y, target_w, stripe),
                PLACEHOLDER_STRIPE,
            );
            y = y.saturating_add(stripe * 2);
        }

        let (w, h) = (target_w as f32, target_h as f32);
        let unit = w.min(h);
        let cx = w / 2.0;
        let head_r = unit * 0.17;
        let head_cy = h * 0.40;
        fill_ellipse(
            &mut image,
            cx,
            h * 0.86,
            unit * 0.36,
            h * 0.30,
            PLACEHOLDER_FIGURE,
        );
        fill_ellipse(&mut image, cx, head_cy, head_r, head_r, PLACEHOLDER_FIGURE);

        let label_px = (target_h / 12).max(MIN_FONT_PX);
        let (label_w, _) = measure(PLACEHOLDER_LABEL, Typeface::Bold, label_px);
        if label_w + 4 <= target_w && label_px * 3 <= target_h {
            let x = i64::from((target_w - label_w) / 2);
            let y = i64::from(target_h / 12);
            draw_text(
                &mut image,
                PLACEHOLDER_LABEL,
                Typeface::Bold,
                label_px,
                x,
                y,
                PLACEHOLDER_INK,
            );
        }

        stroke_inside(
            &mut image,
            PixelRect::sized(target_w, target_h),
            (unit / 100.0).ceil() as u32,
            PLACEHOLDER_FIGURE,
        );

        CanonicalArt {
            image,
            is_placeholder: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/portrait/processor.rs"]
mod tests;
