use image::RgbaImage;

use crate::{
    foundation::{
        core::Rgba8,
        error::{CardError, CardResult},
        math::bitmap_digest,
    },
    geometry::{fit::centered_origin, rect::PixelRect},
    model::{
        record::{CharacterRecord, format_cost, format_income},
        spec::{CardLayout, CardSpec},
    },
    portrait::processor::CanonicalArt,
    render::{
        raster::{blit, fill_rect, fill_vertical, stroke_inside, stroke_outside},
        text::{FittedText, Typeface, draw_text, fit_text},
    },
    style::profile::{StyleBook, StyleProfile},
};

/// A finished card bitmap and the record it shows.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub record: CharacterRecord,
    pub image: RgbaImage,
    /// The art band shows generated placeholder art.
    pub placeholder_art: bool,
}

impl Card {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// FNV-1a digest of the bitmap, stable across runs.
    pub fn fingerprint(&self) -> u64 {
        bitmap_digest(&self.image)
    }
}

/// Renders cards for one card geometry and style book.
#[derive(Clone, Debug)]
pub struct CardCompositor {
    spec: CardSpec,
    styles: StyleBook,
    layout: CardLayout,
}

impl CardCompositor {
    pub fn new(spec: CardSpec, styles: StyleBook) -> CardResult<Self> {
        spec.validate()?;
        let layout = spec.layout();
        Ok(Self {
            spec,
            styles,
            layout,
        })
    }

    pub fn spec(&self) -> &CardSpec {
        &self.spec
    }

    pub fn styles(&self) -> &StyleBook {
        &self.styles
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// Size the canonical art must have.
    pub fn art_size(&self) -> (u32, u32) {
        (self.layout.art.width, self.layout.art.height)
    }

    /// Render one card. Output is exactly the card size and byte-identical for identical
    /// inputs; the only failure is text that cannot be fitted even after truncation.
    pub fn compose(&self, record: &CharacterRecord, art: &CanonicalArt) -> CardResult<Card> {
        let style = self.styles.resolve(&record.tier);
        let layout = &self.layout;
        let border = self.spec.border_width;

        let mut image = RgbaImage::new(self.spec.width, self.spec.height);
        fill_vertical(&mut image, layout.bounds, &style.fill);

        let (ax, ay) = centered_origin(layout.art, art.width(), art.height());
        blit(&mut image, &art.image, ax, ay, layout.art);
        stroke_outside(&mut image, layout.art, (border / 2).max(1), style.accent);

        self.draw_text_band(&mut image, record, style)?;

        stroke_inside(&mut image, layout.bounds, border, style.accent);

        Ok(Card {
            record: record.clone(),
            image,
            placeholder_art: art.is_placeholder,
        })
    }

    fn draw_text_band(
        &self,
        image: &mut RgbaImage,
        record: &CharacterRecord,
        style: &StyleProfile,
    ) -> CardResult<()> {
        let area = self.layout.text;
        let band = self.layout.text_band;
        let last_row = self.spec.height.saturating_sub(1).max(1);
        let t = (band.y + band.height / 2) as f32 / last_row as f32;
        let text_color = style.text_color_on(style.fill.sample(t));

        let slots = self.layout.text_slots();
        let gap = slots.gap;

        let mut y = area.y + gap;

        let name_slot = PixelRect::new(area.x, y, area.width, slots.name);
        let name = fit_text(&record.name, Typeface::Bold, area.width, name_slot.height)
            .map_err(|e| with_record(e, record))?;
        draw_centered(image, &name, Typeface::Bold, name_slot, text_color);
        y = name_slot.bottom() + gap;

        let badge_slot = PixelRect::new(area.x, y, area.width, slots.badge);
        draw_badge(
            image,
            style.badge_text(&record.tier),
            style.accent,
            badge_slot,
            slots.badge_pad(),
        )
            .map_err(|e| with_record(e, record))?;
        y = badge_slot.bottom() + gap;

        for line in [
            format!("Cost: {}", format_cost(record.cost)),
            format!("Income: {}", format_income(record.income)),
        ] {
            let slot = PixelRect::new(area.x, y, area.width, slots.stat);
            let fitted = fit_text(&line, Typeface::Regular, area.width, slot.height)
                .map_err(|e| with_record(e, record))?;
            draw_centered(image, &fitted, Typeface::Regular, slot, text_color);
            y = slot.bottom() + gap;
        }
        Ok(())
    }
}

/// Render a single card without building a compositor.
pub fn compose_card(
    record: &CharacterRecord,
    art: &CanonicalArt,
    spec: &CardSpec,
    styles: &StyleBook,
) -> CardResult<Card> {
    CardCompositor::new(spec.clone(), styles.clone())?.compose(record, art)
}

fn draw_centered(
    image: &mut RgbaImage,
    fitted: &FittedText,
    face: Typeface,
    slot: PixelRect,
    color: Rgba8,
) {
    let (x, y) = centered_origin(slot, fitted.width, fitted.size_px);
    draw_text(image, &fitted.text, face, fitted.size_px, x, y, color);
}

/// Accent-colored chip sized to its label, centered in `slot`.
fn draw_badge(
    image: &mut RgbaImage,
    label: &str,
    accent: Rgba8,
    slot: PixelRect,
    pad: u32,
) -> CardResult<()> {
    let label_h = slot.height.saturating_sub(pad);
    let max_w = slot.width.saturating_sub(2 * pad);
    let fitted = fit_text(label, Typeface::Bold, max_w, label_h)?;

    let chip_w = (fitted.width + 2 * pad).min(slot.width);
    let chip_h = (fitted.size_px + pad).min(slot.height);
    let chip = PixelRect::new(
        slot.x + (slot.width - chip_w) / 2,
        slot.y + (slot.height - chip_h) / 2,
        chip_w,
        chip_h,
    );
    fill_rect(image, chip, accent);
    draw_centered(image, &fitted, Typeface::Bold, chip, accent.contrasting_text());
    Ok(())
}

fn with_record(err: CardError, record: &CharacterRecord) -> CardError {
    match err {
        CardError::Render(msg) => CardError::render(format!("card '{}': {msg}", record.name)),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
