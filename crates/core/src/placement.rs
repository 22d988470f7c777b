//! First-fit placement for newly added widgets.
//!
//! Candidates are scanned row-major starting at the top-left cell: every
//! column of row 0, then every column of row 1, and so on. The first
//! candidate that overlaps no existing widget wins. The scan order is part of
//! the contract; changing it changes where new widgets appear.

use crate::layout::DashboardLayout;
use crate::position::GridPosition;

/// Find the first free `width` x `height` slot in `layout`.
///
/// Returns `None` when the size can never fit the grid (including zero spans)
/// or when every candidate collides. Deterministic: the same layout and size
/// always yield the same result.
pub fn find_placement(layout: &DashboardLayout, width: u32, height: u32) -> Option<GridPosition> {
    if width == 0
        || height == 0
        || width > layout.grid_columns
        || height > layout.grid_rows
    {
        return None;
    }

    for y in 0..=(layout.grid_rows - height) {
        for x in 0..=(layout.grid_columns - width) {
            let candidate = GridPosition::new(x, y, width, height);
            if layout.is_free(&candidate, None) {
                return Some(candidate);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::WidgetInstance;

    fn board(widgets: &[(&str, GridPosition)]) -> DashboardLayout {
        let mut layout = DashboardLayout::empty(6, 4);
        layout.widgets = widgets
            .iter()
            .map(|(id, pos)| WidgetInstance::new(*id, "weather", *pos))
            .collect();
        layout
    }

    #[test]
    fn empty_board_places_at_origin() {
        let layout = board(&[]);
        assert_eq!(
            find_placement(&layout, 2, 2),
            Some(GridPosition::new(0, 0, 2, 2))
        );
    }

    #[test]
    fn too_wide_never_fits() {
        let layout = board(&[]);
        assert_eq!(find_placement(&layout, 7, 1), None);
        assert_eq!(find_placement(&layout, 1, 5), None);
    }

    #[test]
    fn zero_span_is_rejected() {
        let layout = board(&[]);
        assert_eq!(find_placement(&layout, 0, 1), None);
        assert_eq!(find_placement(&layout, 1, 0), None);
    }

    #[test]
    fn scans_across_a_row_before_moving_down() {
        let layout = board(&[("a", GridPosition::new(0, 0, 1, 1))]);
        assert_eq!(
            find_placement(&layout, 1, 1),
            Some(GridPosition::new(1, 0, 1, 1))
        );
    }

    #[test]
    fn moves_to_next_row_when_first_row_is_full() {
        let layout = board(&[("a", GridPosition::new(0, 0, 6, 1))]);
        assert_eq!(
            find_placement(&layout, 2, 1),
            Some(GridPosition::new(0, 1, 2, 1))
        );
    }

    #[test]
    fn large_widget_lands_beside_a_small_one() {
        let layout = board(&[("weather", GridPosition::new(0, 0, 1, 1))]);
        assert_eq!(
            find_placement(&layout, 4, 4),
            Some(GridPosition::new(1, 0, 4, 4))
        );
    }

    #[test]
    fn full_board_has_no_space() {
        let layout = board(&[("a", GridPosition::new(0, 0, 6, 4))]);
        assert_eq!(find_placement(&layout, 1, 1), None);
    }

    #[test]
    fn fragmented_space_is_not_enough_for_a_large_widget() {
        // Free cells exist but no 3x3 block is free.
        let layout = board(&[
            ("a", GridPosition::new(2, 0, 1, 4)),
            ("b", GridPosition::new(0, 2, 6, 1)),
        ]);
        assert_eq!(find_placement(&layout, 3, 3), None);
        assert_eq!(
            find_placement(&layout, 2, 2),
            Some(GridPosition::new(0, 0, 2, 2))
        );
    }

    #[test]
    fn placement_is_deterministic() {
        let layout = board(&[
            ("a", GridPosition::new(0, 0, 2, 2)),
            ("b", GridPosition::new(3, 1, 2, 2)),
        ]);
        let first = find_placement(&layout, 2, 2);
        let second = find_placement(&layout, 2, 2);
        assert_eq!(first, second);
        assert_eq!(first, Some(GridPosition::new(0, 2, 2, 2)));
    }

    #[test]
    fn result_never_overlaps_existing_widgets() {
        let layout = board(&[
            ("a", GridPosition::new(0, 0, 3, 1)),
            ("b", GridPosition::new(4, 0, 2, 3)),
            ("c", GridPosition::new(0, 1, 1, 3)),
        ]);
        for (w, h) in [(1, 1), (2, 2), (3, 2), (2, 3)] {
            if let Some(pos) = find_placement(&layout, w, h) {
                assert!(pos.fits_within(6, 4));
                assert!(layout.is_free(&pos, None), "{w}x{h} placed at {pos:?}");
            }
        }
    }
}
