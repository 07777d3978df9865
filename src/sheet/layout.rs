use crate::{
    foundation::error::{CardError, CardResult},
    geometry::rect::PixelRect,
    model::spec::SheetSpec,
};

/// Placement of a fixed-size card grid on a sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: u32,
    pub cols: u32,
    pub card_w: u32,
    pub card_h: u32,
    pub gutter: u32,
    /// Bounding box of all grid cells, centered on the sheet.
    pub footprint: PixelRect,
    /// One rect per card slot, in reading order.
    pub cells: Vec<PixelRect>,
}

impl GridLayout {
    pub fn capacity(&self) -> u32 {
        self.rows * self.cols
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Candidate {
    rows: u32,
    cols: u32,
    empty: u32,
    leftover: u64,
}

/// Choose a rows×cols grid holding `cards_per_sheet` unscaled cards inside the sheet margins.
///
/// Among the grids that fit, the one with the fewest empty cells wins, then the one whose
/// footprint leaves the least unused area inside the margins, then the one with fewer rows.
/// When nothing fits the result is a [`CardError::Layout`].
pub fn plan_grid(sheet: &SheetSpec, card_w: u32, card_h: u32) -> CardResult<GridLayout> {
    sheet.validate()?;
    if card_w == 0 || card_h == 0 {
        return Err(CardError::layout(format!(
            "card size {card_w}x{card_h} is empty"
        )));
    }

    let n = sheet.cards_per_sheet;
    let gutter = u64::from(sheet.inter_card_margin);
    let usable_w = u64::from(sheet.width) - 2 * u64::from(sheet.margin);
    let usable_h = u64::from(sheet.height) - 2 * u64::from(sheet.margin);
    let span = |count: u32, size: u32| {
        u64::from(count) * u64::from(size) + u64::from(count.saturating_sub(1)) * gutter
    };

    let mut best: Option<Candidate> = None;
    for cols in 1..=n {
        let rows = n.div_ceil(cols);
        // Same rows with fewer columns already holds n; skip the wider duplicate.
        if n.div_ceil(rows) < cols {
            continue;
        }
        let (w, h) = (span(cols, card_w), span(rows, card_h));
        if w > usable_w || h > usable_h {
            continue;
        }
        let candidate = Candidate {
            rows,
            cols,
            empty: rows * cols - n,
            leftover: usable_w * usable_h - w * h,
        };
        let key = |c: &Candidate| (c.empty, c.leftover, c.rows);
        if best.as_ref().is_none_or(|b| key(&candidate) < key(b)) {
            best = Some(candidate);
        }
    }

    let Some(best) = best else {
        return Err(CardError::layout(format!(
            "no grid fits {n} cards of {card_w}x{card_h} on a {}x{} sheet \
             (margin {}, gutter {})",
            sheet.width, sheet.height, sheet.margin, sheet.inter_card_margin
        )));
    };

    let foot_w = span(best.cols, card_w) as u32;
    let foot_h = span(best.rows, card_h) as u32;
    let footprint = PixelRect::new(
        (sheet.width - foot_w) / 2,
        (sheet.height - foot_h) / 2,
        foot_w,
        foot_h,
    );
    let step_x = card_w + sheet.inter_card_margin;
    let step_y = card_h + sheet.inter_card_margin;
    let cells = (0..n)
        .map(|i| {
            let (row, col) = (i / best.cols, i % best.cols);
            PixelRect::new(
                footprint.x + col * step_x,
                footprint.y + row * step_y,
                card_w,
                card_h,
            )
        })
        .collect();

    Ok(GridLayout {
        rows: best.rows,
        cols: best.cols,
        card_w,
        card_h,
        gutter: sheet.inter_card_margin,
        footprint,
        cells,
    })
}

/// Cut-guide bands for a planned grid, each spanning the full sheet width or height.
///
/// Internal lines are centered in the gutters and outer lines sit in the clear border around
/// the grid. A line is never wider than the gap it lives in, so no band touches a card cell;
/// gaps of zero pixels get no line.
pub fn guide_rects(grid: &GridLayout, sheet: &SheetSpec) -> Vec<PixelRect> {
    let stroke = sheet.guide_width;
    let mut out = Vec::new();
    if stroke == 0 {
        return out;
    }
    let f = grid.footprint;

    let mut columns = Vec::new();
    let mut rows = Vec::new();

    // Outer left/top: the gap is the clear border before the grid.
    if let Some(x) = outer_before(f.x, grid.gutter, stroke) {
        columns.push(x);
    }
    if let Some(y) = outer_before(f.y, grid.gutter, stroke) {
        rows.push(y);
    }
    for c in 1..grid.cols {
        let gap_start = f.x + c * (grid.card_w + grid.gutter) - grid.gutter;
        if let Some(x) = centered_in_gap(gap_start, grid.gutter, stroke) {
            columns.push(x);
        }
    }
    for r in 1..grid.rows {
        let gap_start = f.y + r * (grid.card_h + grid.gutter) - grid.gutter;
        if let Some(y) = centered_in_gap(gap_start, grid.gutter, stroke) {
            rows.push(y);
        }
    }
    if let Some(x) = outer_after(f.right(), sheet.width, grid.gutter, stroke) {
        columns.push(x);
    }
    if let Some(y) = outer_after(f.bottom(), sheet.height, grid.gutter, stroke) {
        rows.push(y);
    }

    for (x, w) in columns {
        out.push(PixelRect::new(x, 0, w, sheet.height));
    }
    for (y, h) in rows {
        out.push(PixelRect::new(0, y, sheet.width, h));
    }
    out
}

fn centered_in_gap(gap_start: u32, gap: u32, stroke: u32) -> Option<(u32, u32)> {
    let s = stroke.min(gap);
    (s > 0).then(|| (gap_start + (gap - s) / 2, s))
}

/// Line in the `border` pixels before the grid, offset from the grid edge the way an internal
/// line is offset from its cards.
fn outer_before(border: u32, gutter: u32, stroke: u32) -> Option<(u32, u32)> {
    let s = stroke.min(border);
    if s == 0 {
        return None;
    }
    let offset = (gutter.saturating_sub(s) / 2).min(border - s);
    Some((border - offset - s, s))
}

fn outer_after(grid_end: u32, sheet_end: u32, gutter: u32, stroke: u32) -> Option<(u32, u32)> {
    let border = sheet_end.saturating_sub(grid_end);
    let s = stroke.min(border);
    if s == 0 {
        return None;
    }
    let offset = (gutter.saturating_sub(s) / 2).min(border - s);
    Some((grid_end + offset, s))
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/layout.rs"]
mod tests;
