use crate::foundation::error::{CardError, CardResult};

/// Encoding hint supplied alongside raw portrait bytes (usually derived from a file extension
/// or an HTTP content type by the collaborator that fetched them).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ImageFormatHint {
    /// Sniff the format from the bytes.
    #[default]
    Auto,
    /// File extension such as `"png"` or `".JPG"`.
    Extension(String),
    /// MIME type such as `"image/webp"`.
    MimeType(String),
}

impl ImageFormatHint {
    /// Hint from a path's extension, or [`ImageFormatHint::Auto`] when it has none.
    pub fn from_path(path: &std::path::Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| Self::Extension(e.to_string()))
            .unwrap_or_default()
    }

    fn resolve(&self) -> Option<image::ImageFormat> {
        match self {
            Self::Auto => None,
            Self::Extension(ext) => image::ImageFormat::from_extension(ext.trim_start_matches('.')),
            Self::MimeType(mime) => image::ImageFormat::from_mime_type(mime),
        }
    }
}

/// Quality gate applied after decoding.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PortraitLimits {
    /// Smallest accepted width in pixels.
    pub min_width: u32,
    /// Smallest accepted height in pixels.
    pub min_height: u32,
    /// Largest accepted `long side / short side` ratio.
    pub max_aspect: f64,
}

impl Default for PortraitLimits {
    fn default() -> Self {
        Self {
            min_width: 1,
            min_height: 1,
            max_aspect: 20.0,
        }
    }
}

impl PortraitLimits {
    pub(crate) fn check(&self, width: u32, height: u32) -> CardResult<()> {
        if width == 0 || height == 0 {
            return Err(CardError::invalid_image(format!(
                "decoded image has a zero dimension ({width}x{height})"
            )));
        }
        if width < self.min_width || height < self.min_height {
            return Err(CardError::invalid_image(format!(
                "image {width}x{height} is below the minimum {}x{}",
                self.min_width, self.min_height
            )));
        }
        let (long, short) = (width.max(height), width.min(height));
        let aspect = f64::from(long) / f64::from(short);
        if aspect > self.max_aspect {
            return Err(CardError::invalid_image(format!(
                "image {width}x{height} has an extreme aspect ratio ({aspect:.2} > {:.2})",
                self.max_aspect
            )));
        }
        Ok(())
    }
}

/// Decode encoded portrait bytes into straight RGBA8.
///
/// The hint is tried first; if it names an unknown format, or decoding with it fails, the bytes
/// are sniffed instead. Every failure (empty input, unknown/corrupt data, zero dimensions) is
/// reported as [`CardError::InvalidImage`].
pub fn decode_portrait(bytes: &[u8], hint: &ImageFormatHint) -> CardResult<image::RgbaImage> {
    if bytes.is_empty() {
        return Err(CardError::invalid_image("portrait data is empty"));
    }

    let hinted = hint
        .resolve()
        .and_then(|fmt| image::load_from_memory_with_format(bytes, fmt).ok());
    let dyn_img = match hinted {
        Some(img) => img,
        None => image::load_from_memory(bytes)
            .map_err(|e| CardError::invalid_image(format!("decode portrait: {e}")))?,
    };

    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CardError::invalid_image(format!(
            "decoded image has a zero dimension ({width}x{height})"
        )));
    }
    Ok(rgba)
}

/// Composite every pixel over an opaque background so transparent regions of a portrait never
/// reveal whatever is drawn beneath the art band.
pub(crate) fn flatten_onto(rgba: &mut image::RgbaImage, background: [u8; 3]) {
    for px in rgba.pixels_mut() {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            px[c] = (((u32::from(px[c]) * u32::from(a)) + u32::from(background[c]) * u32::from(inv)
                + 127)
                / 255) as u8;
        }
        px[3] = 255;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
