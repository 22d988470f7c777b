//! Pixel-space to grid-cell resolution.
//!
//! The rendered grid has tracks whose pixel sizes depend on the container and
//! its content, so cell boundaries cannot be derived from the column count
//! alone. A [`GeometryProvider`] reports the live track sizes and gap; the
//! functions here are pure over those measurements.

/// A point in the pointer's coordinate space, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Measured geometry of a rendered grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridMetrics {
    /// Top-left corner of the grid in pointer coordinates.
    pub origin: Point,
    /// Column track widths, left to right.
    pub column_tracks: Vec<f64>,
    /// Row track heights, top to bottom.
    pub row_tracks: Vec<f64>,
    /// Gap between adjacent tracks (same on both axes).
    pub gap: f64,
}

impl GridMetrics {
    /// Uniform tracks, handy for fixed-size boards and tests.
    pub fn uniform(columns: u32, rows: u32, track: f64, gap: f64) -> Self {
        Self {
            origin: Point::default(),
            column_tracks: vec![track; columns as usize],
            row_tracks: vec![track; rows as usize],
            gap,
        }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }
}

/// Source of live grid measurements.
///
/// Implementations read whatever the rendering surface exposes (computed
/// track sizes, gap). Measurements are taken on every call because a window
/// resize or a content change can alter them between pointer events.
pub trait GeometryProvider {
    fn measure(&self) -> GridMetrics;
}

/// A provider that always reports the same measurements.
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry(pub GridMetrics);

impl GeometryProvider for StaticGeometry {
    fn measure(&self) -> GridMetrics {
        self.0.clone()
    }
}

/// Size of track `index`, treating unmeasured tracks as zero.
fn track_size(tracks: &[f64], index: u32) -> f64 {
    tracks.get(index as usize).copied().unwrap_or(0.0)
}

/// Start offset of each of the first `count` tracks, plus the offset one
/// past the last track (`count + 1` entries in total).
///
/// `offset[i] = offset[i - 1] + track[i - 1] + gap`.
pub fn track_offsets(tracks: &[f64], count: u32, gap: f64) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(count as usize + 1);
    let mut cumulative = 0.0;
    offsets.push(cumulative);
    for i in 0..count {
        cumulative += track_size(tracks, i) + gap;
        offsets.push(cumulative);
    }
    offsets
}

/// Snap a one-dimensional offset to a track index.
///
/// Picks the first track whose midpoint lies beyond `offset`, so the pointer
/// has to cross half of a track before the snap advances to it. Past the
/// final midpoint the result is `count`; callers clamp.
fn snap_axis(offset: f64, tracks: &[f64], count: u32, gap: f64) -> u32 {
    let mut cumulative = 0.0;
    for i in 0..count {
        let size = track_size(tracks, i);
        if offset < cumulative + size / 2.0 {
            return i;
        }
        cumulative += size + gap;
    }
    count
}

/// Resolve the cell a widget's top-left corner snaps to.
///
/// `corner` is the widget's top-left corner in pointer coordinates (the
/// pointer minus the grab offset). The result is clamped so a widget of
/// `width` x `height` cells stays inside a `columns` x `rows` grid.
///
/// When the track arrays are shorter than the grid (not yet rendered) the
/// missing tracks count as zero-sized; the result is degenerate and callers
/// should retry once the layout settles.
pub fn resolve_cell(
    corner: Point,
    metrics: &GridMetrics,
    columns: u32,
    rows: u32,
    width: u32,
    height: u32,
) -> (u32, u32) {
    let local = corner - metrics.origin;

    let col = snap_axis(local.x, &metrics.column_tracks, columns, metrics.gap);
    let row = snap_axis(local.y, &metrics.row_tracks, rows, metrics.gap);

    (
        col.min(columns.saturating_sub(width)),
        row.min(rows.saturating_sub(height)),
    )
}

/// Positions of every grid line intersection, relative to the grid origin.
///
/// Produces `(columns + 1) * (rows + 1)` points, row by row. Used to draw the
/// dot guide behind the board in edit mode.
pub fn grid_intersections(metrics: &GridMetrics, columns: u32, rows: u32) -> Vec<Point> {
    let xs = track_offsets(&metrics.column_tracks, columns, metrics.gap);
    let ys = track_offsets(&metrics.row_tracks, rows, metrics.gap);

    ys.iter()
        .flat_map(|&y| xs.iter().map(move |&x| Point::new(x, y)))
        .collect()
}
