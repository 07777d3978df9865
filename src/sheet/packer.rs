use std::fmt;

use image::RgbaImage;

use crate::{
    foundation::{
        error::{CardError, CardResult},
        math::bitmap_digest,
    },
    geometry::rect::PixelRect,
    model::{
        record::CharacterRecord,
        spec::{CardSpec, GuideStyle, SheetSpec, px_to_mm},
    },
    render::{
        compositor::Card,
        raster::{blit, fill_rect},
    },
    sheet::layout::{GridLayout, guide_rects, plan_grid},
};

/// Where one card ended up on a sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub record: CharacterRecord,
    pub rect: PixelRect,
}

/// One rendered print sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    /// 1-based, increasing with input position.
    pub page_index: u32,
    pub image: RgbaImage,
    /// Cards in reading order.
    pub placements: Vec<Placement>,
}

impl Sheet {
    pub fn card_count(&self) -> usize {
        self.placements.len()
    }

    pub fn fingerprint(&self) -> u64 {
        bitmap_digest(&self.image)
    }
}

/// Summary of a packer's configuration, for reports.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetInfo {
    pub rows: u32,
    pub cols: u32,
    pub cards_per_sheet: u32,
    pub card_px: (u32, u32),
    pub sheet_px: (u32, u32),
    pub card_mm: (f64, f64),
    pub sheet_mm: (f64, f64),
    pub cells: Vec<PixelRect>,
    pub guide_count: usize,
}

impl SheetInfo {
    /// Sheets needed for `cards` cards.
    pub fn sheets_for(&self, cards: usize) -> usize {
        cards.div_ceil(self.cards_per_sheet.max(1) as usize)
    }
}

impl fmt::Display for SheetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "sheet: {}x{} px ({:.1} x {:.1} mm)",
            self.sheet_px.0, self.sheet_px.1, self.sheet_mm.0, self.sheet_mm.1
        )?;
        writeln!(
            f,
            "card:  {}x{} px ({:.1} x {:.1} mm)",
            self.card_px.0, self.card_px.1, self.card_mm.0, self.card_mm.1
        )?;
        writeln!(
            f,
            "grid:  {} row(s) x {} col(s), {} card(s) per sheet, {} guide line(s)",
            self.rows, self.cols, self.cards_per_sheet, self.guide_count
        )?;
        for (i, c) in self.cells.iter().enumerate() {
            writeln!(f, "  slot {}: x={} y={}", i + 1, c.x, c.y)?;
        }
        Ok(())
    }
}

/// Tiles finished cards onto print sheets.
///
/// The grid is planned once in [`SheetPacker::new`], so an impossible layout is reported before
/// any card is rendered.
#[derive(Clone, Debug)]
pub struct SheetPacker {
    spec: SheetSpec,
    grid: GridLayout,
    guides: Vec<PixelRect>,
}

impl SheetPacker {
    pub fn new(spec: SheetSpec, card_w: u32, card_h: u32) -> CardResult<Self> {
        let grid = plan_grid(&spec, card_w, card_h)?;
        let guides = if spec.draw_guides {
            guide_rects(&grid, &spec)
        } else {
            Vec::new()
        };
        Ok(Self { spec, grid, guides })
    }

    pub fn for_card(spec: SheetSpec, card: &CardSpec) -> CardResult<Self> {
        Self::new(spec, card.width, card.height)
    }

    pub fn spec(&self) -> &SheetSpec {
        &self.spec
    }

    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    pub fn guides(&self) -> &[PixelRect] {
        &self.guides
    }

    pub fn cards_per_sheet(&self) -> usize {
        self.spec.cards_per_sheet as usize
    }

    pub fn info(&self) -> SheetInfo {
        let dpi = self.spec.dpi;
        SheetInfo {
            rows: self.grid.rows,
            cols: self.grid.cols,
            cards_per_sheet: self.spec.cards_per_sheet,
            card_px: (self.grid.card_w, self.grid.card_h),
            sheet_px: (self.spec.width, self.spec.height),
            card_mm: (px_to_mm(self.grid.card_w, dpi), px_to_mm(self.grid.card_h, dpi)),
            sheet_mm: self.spec.physical_size_mm(),
            cells: self.grid.cells.clone(),
            guide_count: self.guides.len(),
        }
    }

    /// Split `cards` into consecutive groups and render one sheet per group. The last sheet
    /// may hold fewer cards; its empty slots stay background.
    pub fn pack(&self, cards: &[Card]) -> CardResult<Vec<Sheet>> {
        cards
            .chunks(self.cards_per_sheet())
            .zip(1u32..)
            .map(|(group, page)| self.render_sheet(page, group))
            .collect()
    }

    pub fn assembler(&self) -> SheetAssembler<'_> {
        SheetAssembler {
            packer: self,
            pending: Vec::with_capacity(self.cards_per_sheet()),
            next_page: 1,
        }
    }

    /// Render `cards` (at most one sheet's worth) as page `page_index`.
    pub fn render_sheet(&self, page_index: u32, cards: &[Card]) -> CardResult<Sheet> {
        if cards.len() > self.cards_per_sheet() {
            return Err(CardError::layout(format!(
                "{} cards do not fit a {}-card sheet",
                cards.len(),
                self.cards_per_sheet()
            )));
        }

        let mut image =
            RgbaImage::from_pixel(self.spec.width, self.spec.height, self.spec.background.to_pixel());
        let mut placements = Vec::with_capacity(cards.len());
        for (card, &cell) in cards.iter().zip(&self.grid.cells) {
            if (card.width(), card.height()) != (cell.width, cell.height) {
                return Err(CardError::layout(format!(
                    "card '{}' is {}x{}, sheet slots are {}x{}",
                    card.record.name,
                    card.width(),
                    card.height(),
                    cell.width,
                    cell.height
                )));
            }
            blit(&mut image, &card.image, i64::from(cell.x), i64::from(cell.y), cell);
            placements.push(Placement {
                record: card.record.clone(),
                rect: cell,
            });
        }

        for &guide in &self.guides {
            self.draw_guide(&mut image, guide);
        }

        Ok(Sheet {
            page_index,
            image,
            placements,
        })
    }

    fn draw_guide(&self, image: &mut RgbaImage, band: PixelRect) {
        let color = self.spec.cut_guide_color;
        let (dash, gap) = match self.spec.guide_style {
            GuideStyle::Solid => {
                fill_rect(image, band, color);
                return;
            }
            GuideStyle::Dashed { dash, gap } => (dash.max(1), gap),
        };
        let vertical = band.height >= band.width;
        let length = if vertical { band.height } else { band.width };
        let mut pos = 0u32;
        while pos < length {
            let run = dash.min(length - pos);
            let seg = if vertical {
                PixelRect::new(band.x, band.y + pos, band.width, run)
            } else {
                PixelRect::new(band.x + pos, band.y, run, band.height)
            };
            fill_rect(image, seg, color);
            pos = pos.saturating_add(dash).saturating_add(gap);
        }
    }
}

/// Incremental packing: push cards in order, receive each sheet as soon as it is full.
pub struct SheetAssembler<'a> {
    packer: &'a SheetPacker,
    pending: Vec<Card>,
    next_page: u32,
}

impl SheetAssembler<'_> {
    pub fn push(&mut self, card: Card) -> CardResult<Option<Sheet>> {
        self.pending.push(card);
        if self.pending.len() < self.packer.cards_per_sheet() {
            return Ok(None);
        }
        self.flush().map(Some)
    }

    /// Render whatever is pending as a short final sheet.
    pub fn finish(mut self) -> CardResult<Option<Sheet>> {
        if self.pending.is_empty() {
            return Ok(None);
        }
        self.flush().map(Some)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn flush(&mut self) -> CardResult<Sheet> {
        let sheet = self.packer.render_sheet(self.next_page, &self.pending)?;
        self.pending.clear();
        self.next_page += 1;
        Ok(sheet)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/packer.rs"]
mod tests;
