//! Pixel to row resolution and drop position

use super::grid::{PageWindow, RowGrid, RowNode};

/// Where a drop lands relative to the highlighted row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightPosition {
    Above,
    Below,
}

/// Find the row under a page-relative pixel.
///
/// Every row above the page bottom is checked and the last one containing the
/// pixel wins. Rows never overlap in a well-formed grid, so at most one matches.
/// Pixels exactly on a row edge belong to no row.
pub fn row_at_pixel<G: RowGrid + ?Sized>(grid: &G, pixel: f64) -> Option<&RowNode> {
    let window = PageWindow::of(grid)?;
    let row_top_of_page = window.row_top(grid)?;
    let row_bottom_of_page = window.row_bottom(grid)?;

    let mut matched: Option<usize> = None;
    grid.for_each_row_in_display_order(&mut |index, row| {
        if row.top < row_bottom_of_page {
            let pixel_on_row = pixel - (row.top - row_top_of_page);
            if pixel_on_row > 0.0 && pixel_on_row < row.height {
                matched = Some(index);
            }
        }
    });

    matched.and_then(|index| grid.displayed_row_at(index))
}

/// Offset of a page-relative pixel from the top edge of `row`
pub fn pixel_on_row<G: RowGrid + ?Sized>(grid: &G, row: &RowNode, pixel: f64) -> f64 {
    let page_top = PageWindow::of(grid)
        .and_then(|window| window.row_top(grid))
        .unwrap_or(0.0);
    pixel - (row.top - page_top)
}

/// Midpoint split: the upper half is `Above`, the midpoint itself is `Below`
pub fn highlight_position<G: RowGrid + ?Sized>(
    grid: &G,
    row: &RowNode,
    pixel: f64,
) -> HighlightPosition {
    if pixel_on_row(grid, row, pixel) < row.height / 2.0 {
        HighlightPosition::Above
    } else {
        HighlightPosition::Below
    }
}

/// Display index of a row id, if it is currently displayed
pub fn display_index_of<G: RowGrid + ?Sized>(grid: &G, id: &str) -> Option<usize> {
    let mut found = None;
    grid.for_each_row_in_display_order(&mut |index, row| {
        if found.is_none() && row.id == id {
            found = Some(index);
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::grid::VecGrid;

    fn three_rows() -> VecGrid {
        VecGrid::from_heights(&[("a", 1, 40.0), ("b", 2, 40.0), ("c", 3, 40.0)], 10)
    }

    #[test]
    fn resolves_row_inside_bounds() {
        let grid = three_rows();
        assert_eq!(row_at_pixel(&grid, 10.0).map(|r| r.id.as_str()), Some("a"));
        assert_eq!(row_at_pixel(&grid, 50.0).map(|r| r.id.as_str()), Some("b"));
        assert_eq!(row_at_pixel(&grid, 119.0).map(|r| r.id.as_str()), Some("c"));
    }

    #[test]
    fn row_edges_and_outside_pixels_do_not_match() {
        let grid = three_rows();
        assert!(row_at_pixel(&grid, 0.0).is_none());
        assert!(row_at_pixel(&grid, 40.0).is_none());
        assert!(row_at_pixel(&grid, -5.0).is_none());
        assert!(row_at_pixel(&grid, 120.0).is_none());
        assert!(row_at_pixel(&grid, 500.0).is_none());
    }

    #[test]
    fn pixels_are_relative_to_the_current_page() {
        let mut grid = VecGrid::from_heights(
            &[("a", 1, 40.0), ("b", 2, 40.0), ("c", 3, 40.0), ("d", 4, 40.0)],
            2,
        );
        grid.set_page(1);
        assert_eq!(row_at_pixel(&grid, 10.0).map(|r| r.id.as_str()), Some("c"));
        assert_eq!(row_at_pixel(&grid, 60.0).map(|r| r.id.as_str()), Some("d"));
        assert!(row_at_pixel(&grid, 90.0).is_none());
    }

    #[test]
    fn overlapping_rows_resolve_to_the_last_match() {
        let grid = VecGrid::from_rows(
            vec![
                RowNode::new("a", 1, 0.0, 40.0),
                RowNode::new("b", 2, 20.0, 40.0),
                RowNode::new("c", 3, 60.0, 40.0),
            ],
            10,
        );
        assert_eq!(row_at_pixel(&grid, 30.0).map(|r| r.id.as_str()), Some("b"));
        assert_eq!(row_at_pixel(&grid, 10.0).map(|r| r.id.as_str()), Some("a"));
    }

    #[test]
    fn midpoint_belongs_to_below() {
        let grid = three_rows();
        let row = grid.displayed_row_at(0).unwrap().clone();
        assert_eq!(highlight_position(&grid, &row, 19.0), HighlightPosition::Above);
        assert_eq!(highlight_position(&grid, &row, 20.0), HighlightPosition::Below);

        let second = grid.displayed_row_at(1).unwrap().clone();
        assert_eq!(highlight_position(&grid, &second, 59.0), HighlightPosition::Above);
        assert_eq!(highlight_position(&grid, &second, 60.0), HighlightPosition::Below);
    }

    #[test]
    fn empty_grid_never_matches() {
        let grid = VecGrid::from_heights(&[], 5);
        assert!(row_at_pixel(&grid, 1.0).is_none());
    }
}
