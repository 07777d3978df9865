use std::fmt;

use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::{lerp_u8, mul_div255_u8};

/// Straight (non-premultiplied) RGBA8 color.
///
/// Serialized as a hex string: `"#RRGGBB"` or `"#RRGGBBAA"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(s: &str) -> CardResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        let nibble = |c: u8| -> CardResult<u8> {
            (c as char)
                .to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| CardError::validation(format!("invalid hex color '{s}'")))
        };
        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = nibble(bytes[0])?;
                let g = nibble(bytes[1])?;
                let b = nibble(bytes[2])?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 | 8 => {
                let mut ch = [255u8; 4];
                for (i, pair) in bytes.chunks_exact(2).enumerate() {
                    ch[i] = (nibble(pair[0])? << 4) | nibble(pair[1])?;
                }
                Ok(Self::new(ch[0], ch[1], ch[2], ch[3]))
            }
            _ => Err(CardError::validation(format!(
                "invalid hex color '{s}' (expected #RRGGBB or #RRGGBBAA)"
            ))),
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                self.r, self.g, self.b, self.a
            )
        }
    }

    /// Scale color channels toward black. `factor` 0.0 keeps the color, 1.0 yields black.
    pub fn darken(self, factor: f32) -> Self {
        // Integer permille keeps the result independent of float rounding at .5 boundaries.
        let keep = ((1.0 - factor.clamp(0.0, 1.0)) * 1000.0).round() as u32;
        let ch = |c: u8| ((u32::from(c) * keep) / 1000) as u8;
        Self::new(ch(self.r), ch(self.g), ch(self.b), self.a)
    }

    /// Linear interpolation between two colors, `t` clamped to [0, 1].
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            lerp_u8(self.r, other.r, t),
            lerp_u8(self.g, other.g, t),
            lerp_u8(self.b, other.b, t),
            lerp_u8(self.a, other.a, t),
        )
    }

    /// Relative luminance in [0, 1] (Rec. 709 weights, no gamma decoding).
    pub fn luminance(self) -> f32 {
        (0.2126 * f32::from(self.r) + 0.7152 * f32::from(self.g) + 0.0722 * f32::from(self.b))
            / 255.0
    }

    /// Black or white, whichever reads better on top of `self`.
    pub fn contrasting_text(self) -> Self {
        if self.luminance() > 0.55 {
            Self::rgb(20, 20, 24)
        } else {
            Self::WHITE
        }
    }

    /// Source-over composite of `self` onto an opaque-or-not `dst` pixel.
    pub fn over(self, dst: [u8; 4]) -> [u8; 4] {
        let sa = u16::from(self.a);
        if sa == 255 {
            return self.to_array();
        }
        if sa == 0 {
            return dst;
        }
        let inv = 255 - sa;
        let blend = |s: u8, d: u8| {
            mul_div255_u8(u16::from(s), sa).saturating_add(mul_div255_u8(u16::from(d), inv))
        };
        [
            blend(self.r, dst[0]),
            blend(self.g, dst[1]),
            blend(self.b, dst[2]),
            (sa as u8).saturating_add(mul_div255_u8(u16::from(dst[3]), inv)),
        ]
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_pixel(self) -> image::Rgba<u8> {
        image::Rgba(self.to_array())
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = CardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(value: Rgba8) -> Self {
        value.to_hex()
    }
}
