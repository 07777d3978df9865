use std::path::{Path, PathBuf};

use crate::{
    assets::decode::ImageFormatHint,
    foundation::error::{CardError, CardResult},
    portrait::processor::PortraitSource,
};

/// Extensions searched for portraits, in preference order.
pub const PORTRAIT_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Sorted listing of the image files in one directory, used to match records to portraits.
#[derive(Clone, Debug, Default)]
pub struct PortraitIndex {
    files: Vec<PathBuf>,
}

impl PortraitIndex {
    /// Scan `dir` (not recursively). A missing directory yields an empty index.
    pub fn scan(dir: impl AsRef<Path>) -> CardResult<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Self::default());
        }
        let entries = std::fs::read_dir(dir)
            .map_err(|e| CardError::io(format!("read images dir '{}': {e}", dir.display())))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| CardError::io(format!("read images dir '{}': {e}", dir.display())))?
                .path();
            if path.is_file() && extension_rank(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();
        Ok(Self { files })
    }

    pub fn from_files(mut files: Vec<PathBuf>) -> Self {
        files.retain(|p| extension_rank(p).is_some());
        files.sort();
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Best portrait for `name`.
    ///
    /// Tried in order: `<name>.<ext>`, then the first `<name>_*.<ext>` by sorted file name
    /// (extensions in [`PORTRAIT_EXTENSIONS`] order), then any file whose name starts with
    /// `name` ignoring case.
    pub fn find(&self, name: &str) -> Option<&Path> {
        let by_ext = |pred: &dyn Fn(&str) -> bool| {
            PORTRAIT_EXTENSIONS.iter().enumerate().find_map(|(rank, _)| {
                self.files
                    .iter()
                    .find(|p| extension_rank(p) == Some(rank) && stem(p).is_some_and(pred))
            })
        };

        let prefix = format!("{name}_");
        by_ext(&|s| s == name)
            .or_else(|| by_ext(&|s| s.starts_with(&prefix)))
            .or_else(|| {
                let lower = name.to_lowercase();
                self.files.iter().find(|p| {
                    p.file_name()
                        .and_then(|f| f.to_str())
                        .is_some_and(|f| f.to_lowercase().starts_with(&lower))
                })
            })
            .map(PathBuf::as_path)
    }

    /// Read the portrait [`find`](Self::find) picks for `name`.
    ///
    /// A file that cannot be read yields empty bytes, which the portrait processor rejects as
    /// an invalid image, so the card gets placeholder art instead of stopping the batch.
    pub fn load(&self, name: &str) -> Option<PortraitSource> {
        let path = self.find(name)?;
        let hint = ImageFormatHint::from_path(path);
        let bytes = std::fs::read(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "cannot read portrait");
            Vec::new()
        });
        Some(PortraitSource::new(bytes, hint))
    }
}

fn stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    PORTRAIT_EXTENSIONS.iter().position(|e| *e == ext)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/lookup.rs"]
mod tests;
