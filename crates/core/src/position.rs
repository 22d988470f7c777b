//! Grid rectangles and the collision test.
//!
//! Every placement decision in the engine reduces to [`GridPosition::overlaps`].
//! Rectangles are half-open: a widget at `x` with `width` 2 covers columns
//! `x` and `x + 1`, so two widgets that merely share an edge do not collide.

use serde::{Deserialize, Serialize};

/// Span of a widget in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetSize {
    pub width: u32,
    pub height: u32,
}

impl WidgetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both spans are at least one cell.
    pub fn is_valid(&self) -> bool {
        self.width >= 1 && self.height >= 1
    }
}

/// A widget's rectangle on the dashboard grid, in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    /// Zero-based column of the left edge.
    pub x: u32,
    /// Zero-based row of the top edge.
    pub y: u32,
    /// Number of columns covered.
    pub width: u32,
    /// Number of rows covered.
    pub height: u32,
}

impl GridPosition {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Place a rectangle of the given size at `(x, y)`.
    pub const fn at(x: u32, y: u32, size: WidgetSize) -> Self {
        Self::new(x, y, size.width, size.height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn size(&self) -> WidgetSize {
        WidgetSize::new(self.width, self.height)
    }

    /// Same size, new top-left corner.
    pub fn moved_to(&self, x: u32, y: u32) -> Self {
        Self::new(x, y, self.width, self.height)
    }

    /// Whether the two rectangles share any area.
    ///
    /// Symmetric and total. Rectangles that only touch along an edge or a
    /// corner do not overlap.
    pub fn overlaps(&self, other: &GridPosition) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// Whether the rectangle has non-zero spans and lies fully inside a
    /// `columns` x `rows` grid.
    pub fn fits_within(&self, columns: u32, rows: u32) -> bool {
        self.size().is_valid() && self.right() <= columns && self.bottom() <= rows
    }
}
