use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    assets::decode::PortraitLimits,
    batch::pipeline::{BatchOptions, BatchRenderer},
    foundation::error::{CardError, CardResult},
    model::{
        record::CharacterRecord,
        spec::{CardSpec, SheetSpec},
    },
    output::writer::OutputConfig,
    style::profile::{StyleBook, StyleProfile},
};

/// Everything a generator run is configured by, as stored in a JSON file.
///
/// Every section is optional; missing sections take their defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub card: CardSpec,
    pub sheet: SheetSpec,
    pub output: OutputConfig,
    pub batch: BatchOptions,
    pub portrait: PortraitLimits,
    /// Extra or replacement tier styles, merged over the built-in book.
    pub styles: BTreeMap<String, StyleProfile>,
}

impl GeneratorConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CardResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CardError::validation(format!("parse generator config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CardError::io(format!("open generator config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every section. Sheet layout is checked against the card size, so an impossible
    /// arrangement is reported here rather than mid-batch.
    pub fn validate(&self) -> CardResult<()> {
        self.card.validate()?;
        self.sheet.validate()?;
        self.output.validate()?;
        self.style_book()?;
        crate::sheet::packer::SheetPacker::for_card(self.sheet.clone(), &self.card)?;
        Ok(())
    }

    /// Built-in styles with this config's overrides applied.
    pub fn style_book(&self) -> CardResult<StyleBook> {
        StyleBook::builtin().with_overrides(&self.styles)
    }

    pub fn renderer(&self) -> CardResult<BatchRenderer> {
        BatchRenderer::new(
            self.card.clone(),
            self.sheet.clone(),
            self.style_book()?,
            self.portrait,
            self.batch.clone(),
        )
    }
}

/// Read a JSON array of character records.
pub fn read_records<R: std::io::Read>(r: R) -> CardResult<Vec<CharacterRecord>> {
    serde_json::from_reader(r)
        .map_err(|e| CardError::validation(format!("parse records JSON: {e}")))
}

pub fn read_records_path(path: impl AsRef<Path>) -> CardResult<Vec<CharacterRecord>> {
    let path = path.as_ref();
    let f = File::open(path)
        .map_err(|e| CardError::io(format!("open records '{}': {e}", path.display())))?;
    read_records(BufReader::new(f))
}

#[cfg(test)]
#[path = "../../tests/unit/output/config.rs"]
mod tests;
