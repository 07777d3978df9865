/// Axis-aligned pixel rectangle; `x`/`y` is the top-left corner, extents are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub const fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Shrink by `amount` on every side; collapses to an empty rect at the center if too small.
    pub fn inset(self, amount: u32) -> Self {
        let dx = amount.min(self.width / 2);
        let dy = amount.min(self.height / 2);
        Self::new(
            self.x + dx,
            self.y + dy,
            self.width.saturating_sub(amount.saturating_mul(2)),
            self.height.saturating_sub(amount.saturating_mul(2)),
        )
    }

    /// Grow by `amount` on every side, saturating at zero on the top/left.
    pub fn outset(self, amount: u32) -> Self {
        let x = self.x.saturating_sub(amount);
        let y = self.y.saturating_sub(amount);
        Self::new(
            x,
            y,
            self.right().saturating_add(amount) - x,
            self.bottom().saturating_add(amount) - y,
        )
    }

    pub fn contains(self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    pub fn intersection(self, other: Self) -> Option<Self> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x0 < x1 && y0 < y1 {
            Some(Self::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }

    pub fn intersects(self, other: Self) -> bool {
        self.intersection(other).is_some()
    }
}

/// Which edge of a container a proportional region is attached to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    Top,
    Bottom,
}
