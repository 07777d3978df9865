use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::{
    batch::pipeline::BatchSink,
    foundation::error::{CardError, CardResult},
    render::compositor::Card,
    sheet::packer::Sheet,
};

/// Encoded file format for written bitmaps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Where and how cards and sheets are written.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub cards_dir: PathBuf,
    pub sheets_dir: PathBuf,
    /// Every bitmap is written once per listed format.
    pub formats: Vec<OutputFormat>,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
    /// Must contain `{name}` and `{tier}`.
    pub card_template: String,
    /// Must contain `{batch_number}` (rendered zero-padded to three digits).
    pub sheet_template: String,
    /// Put each card under a directory named after its tier.
    pub tier_subdirectories: bool,
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cards_dir: PathBuf::from("output/individual_cards"),
            sheets_dir: PathBuf::from("output/print_sheets"),
            formats: vec![OutputFormat::Png],
            jpeg_quality: 95,
            card_template: "{name}_{tier}_card".to_string(),
            sheet_template: "print_sheet_{batch_number}".to_string(),
            tier_subdirectories: true,
            overwrite: true,
        }
    }
}

impl OutputConfig {
    /// Same layout rooted at `root` (`<root>/individual_cards`, `<root>/print_sheets`).
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            cards_dir: root.join("individual_cards"),
            sheets_dir: root.join("print_sheets"),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> CardResult<()> {
        if self.formats.is_empty() {
            return Err(CardError::validation("output needs at least one format"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CardError::validation(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        for var in ["{name}", "{tier}"] {
            if !self.card_template.contains(var) {
                return Err(CardError::validation(format!(
                    "card_template must contain {var}"
                )));
            }
        }
        if !self.sheet_template.contains("{batch_number}") {
            return Err(CardError::validation(
                "sheet_template must contain {batch_number}",
            ));
        }
        Ok(())
    }

    /// File stem for a card, e.g. `Tim_Cheese_Legendary_card`.
    pub fn card_stem(&self, name: &str, tier: &str) -> String {
        self.card_template
            .replace("{name}", &sanitize_name(name))
            .replace("{tier}", &sanitize_name(tier))
    }

    /// File stem for a sheet, e.g. `print_sheet_007`.
    pub fn sheet_stem(&self, page_index: u32) -> String {
        self.sheet_template
            .replace("{batch_number}", &format!("{page_index:03}"))
    }

    pub fn card_path(&self, name: &str, tier: &str, format: OutputFormat) -> PathBuf {
        let mut dir = self.cards_dir.clone();
        if self.tier_subdirectories {
            dir.push(sanitize_name(tier));
        }
        dir.join(format!("{}.{}", self.card_stem(name, tier), format.extension()))
    }

    pub fn sheet_path(&self, page_index: u32, format: OutputFormat) -> PathBuf {
        self.sheets_dir
            .join(format!("{}.{}", self.sheet_stem(page_index), format.extension()))
    }
}

/// Keep alphanumerics, spaces, `-` and `_`, trim, then turn spaces into `_`.
pub fn sanitize_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let cleaned = kept.trim().replace(' ', "_");
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

/// Encode a bitmap. JPEG drops the alpha channel.
pub fn encode_image(image: &RgbaImage, format: OutputFormat, jpeg_quality: u8) -> CardResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => image
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| CardError::io(format!("encode png: {e}")))?,
        OutputFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, jpeg_quality)
                .encode_image(&rgb)
                .map_err(|e| CardError::io(format!("encode jpeg: {e}")))?;
        }
    }
    Ok(buf)
}

/// Batch sink that writes every card and sheet to disk.
#[derive(Debug)]
pub struct OutputWriter {
    config: OutputConfig,
    written: Vec<PathBuf>,
}

impl OutputWriter {
    pub fn new(config: OutputConfig) -> CardResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            written: Vec::new(),
        })
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Every file written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn write_card(&mut self, card: &Card) -> CardResult<()> {
        for &format in &self.config.formats.clone() {
            let path = self
                .config
                .card_path(&card.record.name, &card.record.tier, format);
            self.write_bitmap(&path, &card.image, format)?;
        }
        Ok(())
    }

    pub fn write_sheet(&mut self, sheet: &Sheet) -> CardResult<()> {
        for &format in &self.config.formats.clone() {
            let path = self.config.sheet_path(sheet.page_index, format);
            self.write_bitmap(&path, &sheet.image, format)?;
        }
        Ok(())
    }

    fn write_bitmap(&mut self, path: &Path, image: &RgbaImage, format: OutputFormat) -> CardResult<()> {
        if !self.config.overwrite && path.exists() {
            return Err(CardError::io(format!(
                "refusing to overwrite '{}'",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CardError::io(format!("create dir '{}': {e}", parent.display())))?;
        }
        let bytes = encode_image(image, format, self.config.jpeg_quality)?;
        std::fs::write(path, bytes)
            .map_err(|e| CardError::io(format!("write '{}': {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "wrote");
        self.written.push(path.to_path_buf());
        Ok(())
    }
}

impl BatchSink for OutputWriter {
    fn begin(&mut self, total: usize) -> CardResult<()> {
        self.written.clear();
        for dir in [&self.config.cards_dir, &self.config.sheets_dir] {
            std::fs::create_dir_all(dir)
                .map_err(|e| CardError::io(format!("create dir '{}': {e}", dir.display())))?;
        }
        tracing::info!(total, dir = %self.config.cards_dir.display(), "writing cards");
        Ok(())
    }

    fn push_card(&mut self, _index: usize, card: &Card) -> CardResult<()> {
        self.write_card(card)
    }

    fn push_sheet(&mut self, sheet: &Sheet) -> CardResult<()> {
        self.write_sheet(sheet)
    }

    fn end(&mut self) -> CardResult<()> {
        tracing::info!(files = self.written.len(), "output complete");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/writer.rs"]
mod tests;
