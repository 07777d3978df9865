use std::collections::BTreeSet;
use std::fmt;

use rayon::prelude::*;

use crate::{
    assets::decode::PortraitLimits,
    foundation::error::{CardError, CardResult, ErrorKind},
    model::{record::CharacterRecord, spec::CardSpec, spec::SheetSpec},
    portrait::processor::{PortraitProcessor, PortraitSource},
    render::compositor::{Card, CardCompositor},
    sheet::packer::{Sheet, SheetInfo, SheetPacker},
    style::profile::StyleBook,
};

/// One record to render, with its portrait bytes if any were found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchItem {
    pub record: CharacterRecord,
    pub portrait: Option<PortraitSource>,
}

impl BatchItem {
    pub fn new(record: CharacterRecord, portrait: Option<PortraitSource>) -> Self {
        Self { record, portrait }
    }
}

/// What to do when a single card fails to render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Leave the card out, record the failure and keep going.
    #[default]
    Skip,
    /// Stop the run with the card's error.
    Abort,
}

/// Options controlling batch execution.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Records rendered per parallel wave; bounds how many bitmaps are alive at once.
    pub chunk_size: usize,
    pub failure_policy: FailurePolicy,
    /// Pack cards onto print sheets as they are produced.
    pub emit_sheets: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            threads: None,
            chunk_size: 16,
            failure_policy: FailurePolicy::Skip,
            emit_sheets: true,
        }
    }
}

/// Consumer of batch output.
///
/// Ordering contract: `push_card` is called in increasing record index order (skipped records
/// leave gaps), and each sheet is pushed right after the card that completed it.
pub trait BatchSink {
    fn begin(&mut self, total: usize) -> CardResult<()>;
    fn push_card(&mut self, index: usize, card: &Card) -> CardResult<()>;
    fn push_sheet(&mut self, sheet: &Sheet) -> CardResult<()>;
    fn end(&mut self) -> CardResult<()>;
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct CollectSink {
    /// Cards with their record index, in order.
    pub cards: Vec<(usize, Card)>,
    pub sheets: Vec<Sheet>,
    total: Option<usize>,
    finished: bool,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> Option<usize> {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl BatchSink for CollectSink {
    fn begin(&mut self, total: usize) -> CardResult<()> {
        self.total = Some(total);
        self.cards.clear();
        self.sheets.clear();
        self.finished = false;
        Ok(())
    }

    fn push_card(&mut self, index: usize, card: &Card) -> CardResult<()> {
        self.cards.push((index, card.clone()));
        Ok(())
    }

    fn push_sheet(&mut self, sheet: &Sheet) -> CardResult<()> {
        self.sheets.push(sheet.clone());
        Ok(())
    }

    fn end(&mut self) -> CardResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// A record that produced no card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchFailure {
    pub index: usize,
    pub name: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Counts for one batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub rendered: usize,
    /// Cards whose art is a placeholder (no portrait, or an unusable one).
    pub placeholders: usize,
    /// Portraits that failed to decode or validate and were replaced.
    pub invalid_portraits: usize,
    pub skipped: usize,
    pub sheets: usize,
    /// Tiers that fell back to the default style, lower-cased.
    pub unknown_tiers: BTreeSet<String>,
    pub failures: Vec<BatchFailure>,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} card(s) rendered ({} placeholder, {} invalid portrait), {} skipped, {} sheet(s)",
            self.rendered,
            self.total,
            self.placeholders,
            self.invalid_portraits,
            self.skipped,
            self.sheets
        )
    }
}

struct Rendered {
    index: usize,
    result: CardResult<Card>,
    invalid_portrait: bool,
}

/// Renders records into cards and sheets using a dedicated rayon pool.
#[derive(Clone, Debug)]
pub struct BatchRenderer {
    processor: PortraitProcessor,
    compositor: CardCompositor,
    packer: SheetPacker,
    opts: BatchOptions,
}

impl BatchRenderer {
    /// Validate all geometry up front; an impossible sheet layout fails here, before any card
    /// is processed.
    pub fn new(
        card: CardSpec,
        sheet: SheetSpec,
        styles: StyleBook,
        limits: PortraitLimits,
        opts: BatchOptions,
    ) -> CardResult<Self> {
        let packer = SheetPacker::for_card(sheet, &card)?;
        let compositor = CardCompositor::new(card, styles)?;
        if opts.threads == Some(0) {
            return Err(CardError::validation("'threads' must be >= 1 when set"));
        }
        Ok(Self {
            processor: PortraitProcessor::new(limits),
            compositor,
            packer,
            opts,
        })
    }

    pub fn compositor(&self) -> &CardCompositor {
        &self.compositor
    }

    pub fn packer(&self) -> &SheetPacker {
        &self.packer
    }

    pub fn sheet_info(&self) -> SheetInfo {
        self.packer.info()
    }

    pub fn options(&self) -> &BatchOptions {
        &self.opts
    }

    /// Render one record. An unusable portrait is replaced by placeholder art; the returned
    /// flag reports that substitution.
    pub fn render_card(&self, item: &BatchItem) -> CardResult<(Card, bool)> {
        self.render_record(&item.record, item.portrait.as_ref())
    }

    fn render_record(
        &self,
        record: &CharacterRecord,
        portrait: Option<&PortraitSource>,
    ) -> CardResult<(Card, bool)> {
        record.validate()?;
        let (w, h) = self.compositor.art_size();
        let (art, invalid) = match self.processor.process(portrait, w, h) {
            Ok(art) => (art, false),
            Err(CardError::InvalidImage(reason)) => {
                tracing::warn!(
                    name = %record.name,
                    %reason,
                    "unusable portrait, using placeholder art"
                );
                (self.processor.placeholder(w, h), true)
            }
            Err(e) => return Err(e),
        };
        let card = self.compositor.compose(record, &art)?;
        Ok((card, invalid))
    }

    /// Render every item in order, streaming cards and sheets into `sink`.
    #[tracing::instrument(skip(self, items, sink), fields(items = items.len()))]
    pub fn run(&self, items: &[BatchItem], sink: &mut dyn BatchSink) -> CardResult<BatchReport> {
        self.run_indexed(
            items.len(),
            move |i| &items[i].record,
            |i| self.render_card(&items[i]),
            sink,
        )
    }

    /// Like [`run`](Self::run), but portraits are produced by `load` on the worker threads,
    /// one chunk at a time, so at most `chunk_size` portraits are held in memory.
    #[tracing::instrument(skip(self, records, load, sink), fields(records = records.len()))]
    pub fn run_with_loader<F>(
        &self,
        records: &[CharacterRecord],
        load: F,
        sink: &mut dyn BatchSink,
    ) -> CardResult<BatchReport>
    where
        F: Fn(&CharacterRecord) -> Option<PortraitSource> + Sync,
    {
        self.run_indexed(
            records.len(),
            move |i| &records[i],
            |i| {
                let portrait = load(&records[i]);
                self.render_record(&records[i], portrait.as_ref())
            },
            sink,
        )
    }

    fn run_indexed<'r, A, R>(
        &self,
        total: usize,
        record_at: A,
        render: R,
        sink: &mut dyn BatchSink,
    ) -> CardResult<BatchReport>
    where
        A: Fn(usize) -> &'r CharacterRecord,
        R: Fn(usize) -> CardResult<(Card, bool)> + Sync,
    {
        let pool = build_thread_pool(self.opts.threads)?;
        let chunk_size = normalized_chunk_size(self.opts.chunk_size);
        let styles = self.compositor.styles();

        let mut report = BatchReport {
            total,
            ..BatchReport::default()
        };
        let mut assembler = self.opts.emit_sheets.then(|| self.packer.assembler());

        sink.begin(total)?;

        for (chunk_idx, base) in (0..total).step_by(chunk_size).enumerate() {
            let end = (base + chunk_size).min(total);
            let mut rendered = pool.install(|| {
                (base..end)
                    .into_par_iter()
                    .map(|index| {
                        let (result, invalid_portrait) = match render(index) {
                            Ok((card, invalid)) => (Ok(card), invalid),
                            Err(e) => (Err(e), false),
                        };
                        Rendered {
                            index,
                            result,
                            invalid_portrait,
                        }
                    })
                    .collect::<Vec<_>>()
            });
            rendered.sort_by_key(|r| r.index);
            tracing::debug!(chunk = chunk_idx, cards = rendered.len(), "chunk rendered");

            for r in rendered {
                let record = record_at(r.index);
                if r.invalid_portrait {
                    report.invalid_portraits += 1;
                }

                let card = match r.result {
                    Ok(card) => card,
                    Err(e) => match self.opts.failure_policy {
                        FailurePolicy::Abort => return Err(e),
                        FailurePolicy::Skip => {
                            tracing::warn!(name = %record.name, error = %e, "skipping card");
                            report.skipped += 1;
                            report.failures.push(BatchFailure {
                                index: r.index,
                                name: record.name.clone(),
                                kind: e.kind(),
                                message: e.to_string(),
                            });
                            continue;
                        }
                    },
                };

                if !styles.contains(&record.tier)
                    && report.unknown_tiers.insert(record.tier.to_lowercase())
                {
                    tracing::warn!(tier = %record.tier, "unknown tier, using default style");
                }
                report.rendered += 1;
                if card.placeholder_art {
                    report.placeholders += 1;
                }
                sink.push_card(r.index, &card)?;

                if let Some(asm) = assembler.as_mut()
                    && let Some(sheet) = asm.push(card)?
                {
                    report.sheets += 1;
                    sink.push_sheet(&sheet)?;
                }
            }
        }

        if let Some(asm) = assembler
            && let Some(sheet) = asm.finish()?
        {
            report.sheets += 1;
            sink.push_sheet(&sheet)?;
        }

        sink.end()?;
        tracing::info!(%report, "batch finished");
        Ok(report)
    }
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

fn build_thread_pool(threads: Option<usize>) -> CardResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CardError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(pool_error)
}

fn pool_error(e: rayon::ThreadPoolBuildError) -> CardError {
    CardError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/pipeline.rs"]
mod tests;
