//! Bitmap text built on the embedded-graphics ASCII mono fonts.
//!
//! Glyphs are rasterized at the font's native cell size into a [`Mask`] and scaled
//! nearest-neighbour to the requested pixel height, so output never depends on installed fonts.

use std::borrow::Cow;

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_9X18_BOLD, FONT_10X20},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use image::RgbaImage;

use crate::{
    foundation::{
        core::Rgba8,
        error::{CardError, CardResult},
    },
    render::raster::{Mask, paint_mask},
};

/// Smallest pixel size the fitter will try.
pub const MIN_FONT_PX: u32 = 10;

const ELLIPSIS: &str = "...";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Typeface {
    #[default]
    Regular,
    Bold,
}

impl Typeface {
    fn font(self) -> &'static MonoFont<'static> {
        match self {
            Self::Regular => &FONT_10X20,
            Self::Bold => &FONT_9X18_BOLD,
        }
    }

    fn advance(self) -> u32 {
        let font = self.font();
        font.character_size.width + font.character_spacing
    }

    fn cell_height(self) -> u32 {
        self.font().character_size.height
    }
}

/// Width and height in pixels of `text` set at `size_px`.
pub fn measure(text: &str, face: Typeface, size_px: u32) -> (u32, u32) {
    let chars = normalize(text).chars().count() as u64;
    let base_w = chars * u64::from(face.advance());
    let w = base_w * u64::from(size_px) / u64::from(face.cell_height());
    (u32::try_from(w).unwrap_or(u32::MAX), size_px)
}

/// Coverage mask of `text` at `size_px`.
pub fn rasterize(text: &str, face: Typeface, size_px: u32) -> Mask {
    let text = normalize(text);
    let chars = text.chars().count() as u32;
    let mut canvas = GlyphCanvas(Mask::new(
        chars.saturating_mul(face.advance()),
        face.cell_height(),
    ));
    let style = MonoTextStyle::new(face.font(), BinaryColor::On);
    Text::with_baseline(&text, Point::zero(), style, Baseline::Top)
        .draw(&mut canvas)
        .unwrap_or_else(|never| match never {});

    let (w, h) = measure(&text, face, size_px);
    canvas.0.scaled(w, h)
}

/// Draw `text` with its top-left at `(x, y)`.
pub fn draw_text(
    img: &mut RgbaImage,
    text: &str,
    face: Typeface,
    size_px: u32,
    x: i64,
    y: i64,
    color: Rgba8,
) {
    let mask = rasterize(text, face, size_px);
    paint_mask(img, &mask, x, y, color);
}

/// Result of [`fit_text`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FittedText {
    pub text: String,
    pub size_px: u32,
    pub width: u32,
    pub truncated: bool,
}

/// Largest size in `[MIN_FONT_PX, max_height]` whose rendered width fits in `max_width`, found
/// by binary search (width is monotone in size).
///
/// If the text is too wide even at the minimum size it is shortened with a trailing `...`;
/// when not even one character plus the marker fits, or the slot is shorter than
/// [`MIN_FONT_PX`], a [`CardError::Render`] is returned.
pub fn fit_text(
    text: &str,
    face: Typeface,
    max_width: u32,
    max_height: u32,
) -> CardResult<FittedText> {
    let lo = MIN_FONT_PX;
    if max_height < lo {
        return Err(CardError::render(format!(
            "text '{text}' needs a {lo}px line, slot is {max_height}px tall"
        )));
    }
    let fits = |s: &str, size: u32| measure(s, face, size).0 <= max_width;

    if fits(text, lo) {
        let (mut lo, mut hi) = (lo, max_height);
        while lo < hi {
            let mid = lo + (hi - lo).div_ceil(2);
            if fits(text, mid) {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        return Ok(FittedText {
            text: text.to_string(),
            size_px: lo,
            width: measure(text, face, lo).0,
            truncated: false,
        });
    }

    let chars: Vec<char> = normalize(text).chars().collect();
    let shortened = |keep: usize| {
        let mut s = chars[..keep].iter().collect::<String>().trim_end().to_string();
        s.push_str(ELLIPSIS);
        s
    };

    // Longest kept prefix that still fits; width only grows with `keep`.
    let first_ink = chars.iter().position(|c| !c.is_whitespace());
    if let Some(first) = first_ink
        && first + 1 < chars.len()
        && fits(&shortened(first + 1), lo)
    {
        let (mut keep, mut hi) = (first + 1, chars.len() - 1);
        while keep < hi {
            let mid = keep + (hi - keep).div_ceil(2);
            if fits(&shortened(mid), lo) {
                keep = mid;
            } else {
                hi = mid - 1;
            }
        }
        let candidate = shortened(keep);
        return Ok(FittedText {
            width: measure(&candidate, face, lo).0,
            text: candidate,
            size_px: lo,
            truncated: true,
        });
    }

    Err(CardError::render(format!(
        "text '{text}' does not fit in {max_width}px even at {lo}px with truncation"
    )))
}

/// Map typographic punctuation onto ASCII and anything else outside the font onto `?`.
fn normalize(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{00A0}' | '\t' => out.push(' '),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2026}' => out.push_str(ELLIPSIS),
            c if c.is_ascii_control() => {}
            c if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    Cow::Owned(out)
}

struct GlyphCanvas(Mask);

impl OriginDimensions for GlyphCanvas {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl DrawTarget for GlyphCanvas {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            self.0.set(point.x as u32, point.y as u32, color.is_on());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
