use crate::{
    foundation::{
        core::Rgba8,
        error::{CardError, CardResult},
    },
    geometry::{
        fit::proportional_region,
        rect::{Anchor, PixelRect},
    },
    render::text::MIN_FONT_PX,
};

const MM_PER_INCH: f64 = 25.4;
const DEFAULT_BORDER: u32 = 12;

// Vertical budget of the text area, in hundredths of its height.
const NAME_SHARE: u32 = 28;
const BADGE_SHARE: u32 = 18;
const STAT_SHARE: u32 = 14;
const GAP_COUNT: u32 = 5;

/// Card geometry in pixels.
///
/// `dpi` only documents the physical print size; all layout math is done in pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardSpec {
    pub width: u32,
    pub height: u32,
    /// Gap between the card edge and the art/text content.
    pub margin: u32,
    /// Fraction of the card height given to the art band, strictly between 0 and 1.
    pub image_ratio: f64,
    pub dpi: u32,
    /// Stroke of the outer frame and of the rule around the art.
    pub border_width: u32,
}

impl Default for CardSpec {
    /// A5 portrait at 300 DPI.
    fn default() -> Self {
        Self {
            width: 1745,
            height: 2468,
            margin: 50,
            image_ratio: 0.6,
            dpi: 300,
            border_width: DEFAULT_BORDER,
        }
    }
}

/// Pixel rectangles of one card, all in card coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardLayout {
    pub bounds: PixelRect,
    pub art_band: PixelRect,
    pub text_band: PixelRect,
    /// Where the canonical art is placed (the art band inset by the margin).
    pub art: PixelRect,
    /// Where text is laid out (the text band minus side and bottom margins).
    pub text: PixelRect,
}

impl CardLayout {
    pub fn text_slots(&self) -> TextSlots {
        TextSlots::for_height(self.text.height)
    }
}

/// Heights of the lines stacked in the text area: the name, the tier badge and two stat
/// lines, separated by equal gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextSlots {
    pub name: u32,
    pub badge: u32,
    pub stat: u32,
    pub gap: u32,
}

impl TextSlots {
    pub fn for_height(height: u32) -> Self {
        let share = |pct: u32| (u64::from(height) * u64::from(pct) / 100) as u32;
        let (name, badge, stat) = (share(NAME_SHARE), share(BADGE_SHARE), share(STAT_SHARE));
        let used = u64::from(name) + u64::from(badge) + 2 * u64::from(stat);
        let gap = (u64::from(height).saturating_sub(used) / u64::from(GAP_COUNT)) as u32;
        Self {
            name,
            badge,
            stat,
            gap,
        }
    }

    /// Padding between the badge chip edge and its label.
    pub fn badge_pad(&self) -> u32 {
        (self.badge / 4).max(2)
    }

    pub fn badge_label(&self) -> u32 {
        self.badge.saturating_sub(self.badge_pad())
    }

    /// Height of the shortest line, which bounds the smallest font the card can show.
    pub fn smallest_line(&self) -> u32 {
        self.name.min(self.badge_label()).min(self.stat)
    }
}

impl CardSpec {
    pub fn new(width: u32, height: u32, margin: u32, image_ratio: f64) -> Self {
        Self {
            width,
            height,
            margin,
            image_ratio,
            dpi: 300,
            border_width: DEFAULT_BORDER.min(margin),
        }
    }

    pub fn validate(&self) -> CardResult<()> {
        let twice_margin = u64::from(self.margin) * 2;
        if u64::from(self.width) <= twice_margin || u64::from(self.height) <= twice_margin {
            return Err(CardError::validation(format!(
                "card {}x{} must exceed twice the margin ({})",
                self.width, self.height, self.margin
            )));
        }
        if !self.image_ratio.is_finite() || self.image_ratio <= 0.0 || self.image_ratio >= 1.0 {
            return Err(CardError::validation(format!(
                "image_ratio must be in (0, 1), got {}",
                self.image_ratio
            )));
        }
        if self.dpi == 0 {
            return Err(CardError::validation("dpi must be > 0"));
        }
        if self.border_width > self.margin {
            return Err(CardError::validation(format!(
                "border_width {} must not exceed the margin {}",
                self.border_width, self.margin
            )));
        }

        let layout = self.layout();
        if layout.art.is_empty() {
            return Err(CardError::validation(format!(
                "art area is empty: art band {}px tall with margin {}",
                layout.art_band.height, self.margin
            )));
        }
        if layout.text.is_empty() {
            return Err(CardError::validation(format!(
                "text area is empty: text band {}px tall with margin {}",
                layout.text_band.height, self.margin
            )));
        }
        let smallest = layout.text_slots().smallest_line();
        if smallest < MIN_FONT_PX {
            return Err(CardError::validation(format!(
                "text area is {}px tall, leaving a {smallest}px line; text needs at least {MIN_FONT_PX}px",
                layout.text.height
            )));
        }
        Ok(())
    }

    pub fn layout(&self) -> CardLayout {
        let split = proportional_region(self.width, self.height, self.image_ratio, Anchor::Top);
        let art = split.region.inset(self.margin);
        let band = split.remainder;
        let text = PixelRect::new(
            band.x + self.margin,
            band.y,
            band.width.saturating_sub(self.margin * 2),
            band.height.saturating_sub(self.margin),
        );
        CardLayout {
            bounds: PixelRect::sized(self.width, self.height),
            art_band: split.region,
            text_band: band,
            art,
            text,
        }
    }

    /// Pixel size the portrait processor must produce for this card.
    pub fn art_size(&self) -> (u32, u32) {
        let art = self.layout().art;
        (art.width, art.height)
    }

    /// Printed size in millimetres.
    pub fn physical_size_mm(&self) -> (f64, f64) {
        (
            px_to_mm(self.width, self.dpi),
            px_to_mm(self.height, self.dpi),
        )
    }
}

/// Cut-line pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuideStyle {
    #[default]
    Solid,
    /// On/off run lengths in pixels along the line.
    Dashed { dash: u32, gap: u32 },
}

/// Print sheet geometry in pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SheetSpec {
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
    pub cards_per_sheet: u32,
    /// Minimum clear border around the card grid.
    pub margin: u32,
    /// Gutter between neighbouring cards.
    pub inter_card_margin: u32,
    pub cut_guide_color: Rgba8,
    pub guide_width: u32,
    pub draw_guides: bool,
    pub guide_style: GuideStyle,
    pub background: Rgba8,
}

impl Default for SheetSpec {
    /// A4 landscape at 300 DPI holding two A5 cards.
    fn default() -> Self {
        Self {
            width: 3508,
            height: 2480,
            dpi: 300,
            cards_per_sheet: 2,
            margin: 6,
            inter_card_margin: 6,
            cut_guide_color: Rgba8::BLACK,
            guide_width: 2,
            draw_guides: true,
            guide_style: GuideStyle::Solid,
            background: Rgba8::WHITE,
        }
    }
}

impl SheetSpec {
    pub fn validate(&self) -> CardResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CardError::validation(format!(
                "sheet {}x{} must be non-empty",
                self.width, self.height
            )));
        }
        if self.cards_per_sheet == 0 {
            return Err(CardError::validation("cards_per_sheet must be >= 1"));
        }
        if self.dpi == 0 {
            return Err(CardError::validation("dpi must be > 0"));
        }
        let twice_margin = u64::from(self.margin) * 2;
        if u64::from(self.width) <= twice_margin || u64::from(self.height) <= twice_margin {
            return Err(CardError::validation(format!(
                "sheet {}x{} must exceed twice the margin ({})",
                self.width, self.height, self.margin
            )));
        }
        if self.draw_guides {
            if self.guide_width == 0 {
                return Err(CardError::validation(
                    "guide_width must be > 0 when draw_guides is set",
                ));
            }
            if let GuideStyle::Dashed { dash: 0, .. } = self.guide_style {
                return Err(CardError::validation("dashed guides need dash > 0"));
            }
        }
        Ok(())
    }

    pub fn physical_size_mm(&self) -> (f64, f64) {
        (
            px_to_mm(self.width, self.dpi),
            px_to_mm(self.height, self.dpi),
        )
    }
}

pub(crate) fn px_to_mm(px: u32, dpi: u32) -> f64 {
    if dpi == 0 {
        return 0.0;
    }
    f64::from(px) / f64::from(dpi) * MM_PER_INCH
}

#[cfg(test)]
#[path = "../../tests/unit/model/spec.rs"]
mod tests;
