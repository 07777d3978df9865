use std::collections::BTreeMap;

use crate::foundation::{
    core::Rgba8,
    error::{CardError, CardResult},
};

/// Gradient stop at `offset` in [0, 1] along the card's vertical axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba8,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba8) -> Self {
        Self { offset, color }
    }
}

/// Card background paint.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    Solid(Rgba8),
    /// Stops are kept sorted by offset.
    Gradient(Vec<ColorStop>),
}

impl Fill {
    pub fn gradient(mut stops: Vec<ColorStop>) -> Self {
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self::Gradient(stops)
    }

    /// Representative color: the solid color or the first stop.
    pub fn primary(&self) -> Rgba8 {
        match self {
            Self::Solid(c) => *c,
            Self::Gradient(stops) => stops.first().map_or(Rgba8::TRANSPARENT, |s| s.color),
        }
    }

    /// Color at `t` in [0, 1]. Positions outside the stop range take the nearest end color.
    pub fn sample(&self, t: f32) -> Rgba8 {
        let stops = match self {
            Self::Solid(c) => return *c,
            Self::Gradient(stops) => stops,
        };
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };

        let Some(first) = stops.first() else {
            return Rgba8::TRANSPARENT;
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f32::EPSILON {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.offset) / span);
            }
        }
        stops.last().map_or(first.color, |s| s.color)
    }

    pub fn validate(&self) -> CardResult<()> {
        let Self::Gradient(stops) = self else {
            return Ok(());
        };
        if stops.is_empty() {
            return Err(CardError::validation("gradient needs at least one stop"));
        }
        for s in stops {
            if !s.offset.is_finite() || !(0.0..=1.0).contains(&s.offset) {
                return Err(CardError::validation(format!(
                    "gradient stop offset must be in [0, 1], got {}",
                    s.offset
                )));
            }
        }
        if stops.windows(2).any(|w| w[0].offset > w[1].offset) {
            return Err(CardError::validation("gradient stops must be sorted by offset"));
        }
        Ok(())
    }
}

/// Visual identity of one tier.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyleProfile {
    pub fill: Fill,
    pub accent: Rgba8,
    /// Text on the badge chip; empty means "use the record's tier".
    #[serde(default)]
    pub badge_label: String,
    /// Overrides the luminance-derived text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Rgba8>,
}

impl StyleProfile {
    /// Solid profile with the accent derived from the primary color.
    pub fn solid(primary: Rgba8, badge_label: impl Into<String>) -> Self {
        Self {
            fill: Fill::Solid(primary),
            accent: primary.darken(ACCENT_DARKEN),
            badge_label: badge_label.into(),
            text_color: None,
        }
    }

    pub fn gradient(stops: Vec<ColorStop>, badge_label: impl Into<String>) -> Self {
        let fill = Fill::gradient(stops);
        Self {
            accent: fill.primary().darken(ACCENT_DARKEN),
            fill,
            badge_label: badge_label.into(),
            text_color: None,
        }
    }

    pub fn primary(&self) -> Rgba8 {
        self.fill.primary()
    }

    /// Text color readable on `background`.
    pub fn text_color_on(&self, background: Rgba8) -> Rgba8 {
        self.text_color
            .unwrap_or_else(|| background.contrasting_text())
    }

    pub fn badge_text<'a>(&'a self, tier: &'a str) -> &'a str {
        if self.badge_label.trim().is_empty() {
            tier
        } else {
            &self.badge_label
        }
    }

    pub fn validate(&self) -> CardResult<()> {
        self.fill.validate()
    }
}

const ACCENT_DARKEN: f32 = 0.3;

/// Immutable tier → profile mapping with one fallback entry.
///
/// Keys are matched case-insensitively.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleBook {
    profiles: BTreeMap<String, StyleProfile>,
    fallback: StyleProfile,
}

impl Default for StyleBook {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleBook {
    pub fn new(fallback: StyleProfile) -> Self {
        Self {
            profiles: BTreeMap::new(),
            fallback,
        }
    }

    /// The tier palette of the card game.
    pub fn builtin() -> Self {
        let gold = vec![
            ColorStop::new(0.0, Rgba8::rgb(0xFF, 0xD7, 0x00)),
            ColorStop::new(1.0, Rgba8::rgb(0xDA, 0xA5, 0x20)),
        ];
        let rainbow = vec![
            ColorStop::new(0.0, Rgba8::rgb(0xFF, 0x14, 0x93)),
            ColorStop::new(0.2, Rgba8::rgb(0xFF, 0x8C, 0x00)),
            ColorStop::new(0.4, Rgba8::rgb(0xFF, 0xD7, 0x00)),
            ColorStop::new(0.6, Rgba8::rgb(0x32, 0xCD, 0x32)),
            ColorStop::new(0.8, Rgba8::rgb(0x1E, 0x90, 0xFF)),
            ColorStop::new(1.0, Rgba8::rgb(0x8A, 0x2B, 0xE2)),
        ];
        let cyan = Rgba8::rgb(0x00, 0xFF, 0xFF);

        let mut book = Self::new(StyleProfile::solid(Rgba8::rgb(0x80, 0x80, 0x80), ""));
        book.insert("Common", StyleProfile::solid(Rgba8::rgb(0x80, 0x80, 0x80), "Common"));
        book.insert("Rare", StyleProfile::solid(Rgba8::rgb(0x41, 0x69, 0xE1), "Rare"));
        book.insert("Epic", StyleProfile::solid(Rgba8::rgb(0x8A, 0x2B, 0xE2), "Epic"));
        book.insert(
            "Legendary",
            StyleProfile::solid(Rgba8::rgb(0xFF, 0x8C, 0x00), "Legendary"),
        );
        book.insert("Mythic", StyleProfile::solid(Rgba8::rgb(0xDC, 0x14, 0x3C), "Mythic"));
        book.insert(
            "Brainrot God",
            StyleProfile::gradient(gold.clone(), "Brainrot God"),
        );
        book.insert("Secret", StyleProfile::solid(cyan, "Secret"));
        book.insert("OG", StyleProfile::gradient(rainbow, "OG"));
        book.insert("Admin", StyleProfile::solid(Rgba8::rgb(0xFF, 0x00, 0x00), "Admin"));
        book.insert("Taco", StyleProfile::solid(Rgba8::rgb(0xFF, 0xFF, 0x00), "Taco"));
        // Legacy names.
        book.insert("Divine", StyleProfile::gradient(gold, "Divine"));
        book.insert("Celestial", StyleProfile::solid(cyan, "Celestial"));
        book
    }

    pub fn insert(&mut self, tier: &str, profile: StyleProfile) {
        self.profiles.insert(tier.to_lowercase(), profile);
    }

    /// Copy of this book with `overrides` replacing or adding tiers.
    pub fn with_overrides<'a, I>(&self, overrides: I) -> CardResult<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a StyleProfile)>,
    {
        let mut book = self.clone();
        for (tier, profile) in overrides {
            profile
                .validate()
                .map_err(|e| CardError::validation(format!("style for tier '{tier}': {e}")))?;
            book.insert(tier, profile.clone());
        }
        Ok(book)
    }

    pub fn lookup(&self, tier: &str) -> Option<&StyleProfile> {
        self.profiles.get(&tier.to_lowercase())
    }

    /// Profile for `tier`, or the fallback profile when the tier is unknown. Never fails.
    pub fn resolve(&self, tier: &str) -> &StyleProfile {
        self.lookup(tier).unwrap_or(&self.fallback)
    }

    pub fn contains(&self, tier: &str) -> bool {
        self.lookup(tier).is_some()
    }

    pub fn fallback(&self) -> &StyleProfile {
        &self.fallback
    }

    /// Lower-cased tier keys with their profiles, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleProfile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/profile.rs"]
mod tests;
