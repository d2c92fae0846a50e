//! Row model and the grid collaborator the engine reads positions from

/// One displayed row, as positioned by the host grid for the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct RowNode {
    /// Stable task identifier
    pub id: String,
    /// Sort key (ascending for pending tasks)
    pub order: i64,
    /// Top edge within the full virtual list, not just the current page
    pub top: f64,
    pub height: f64,
}

impl RowNode {
    pub fn new(id: impl Into<String>, order: i64, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            order,
            top,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Paginated, filtered and sorted row source driven by the engine.
///
/// Implemented by whatever renders the task table. The engine never mutates
/// rows, it only reads geometry and flips pages.
pub trait RowGrid {
    fn displayed_row_count(&self) -> usize;

    fn displayed_row_at(&self, index: usize) -> Option<&RowNode>;

    fn page_size(&self) -> usize;

    /// Zero-based index of the page currently shown
    fn current_page(&self) -> usize;

    fn total_pages(&self) -> usize;

    fn go_to_previous_page(&mut self);

    fn go_to_next_page(&mut self);

    /// Visit rows in display order (after filter and sort) with their display index
    fn for_each_row_in_display_order(&self, visitor: &mut dyn FnMut(usize, &RowNode));

    /// Visit `(id, order)` for every row of the underlying sequence, including
    /// rows a filter hides. Move anchors are picked from this sequence.
    fn for_each_row_in_full_order(&self, visitor: &mut dyn FnMut(&str, i64)) {
        self.for_each_row_in_display_order(&mut |_, row| visitor(&row.id, row.order));
    }
}

/// Index bounds of the page currently shown by a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub first_row_index: usize,
    pub last_row_index: usize,
}

impl PageWindow {
    /// Bounds of the current page, or `None` when nothing is displayed
    pub fn of<G: RowGrid + ?Sized>(grid: &G) -> Option<Self> {
        let count = grid.displayed_row_count();
        if count == 0 {
            return None;
        }

        let page_size = grid.page_size().max(1);
        let first_row_index = page_size * grid.current_page();
        let last_row_index = (page_size * (grid.current_page() + 1) - 1).min(count - 1);

        Some(Self {
            first_row_index,
            last_row_index,
        })
    }

    /// Absolute top of the page's first row, used to make pixels page-relative
    pub fn row_top<G: RowGrid + ?Sized>(&self, grid: &G) -> Option<f64> {
        grid.displayed_row_at(self.first_row_index).map(|row| row.top)
    }

    /// Absolute bottom of the page's last row
    pub fn row_bottom<G: RowGrid + ?Sized>(&self, grid: &G) -> Option<f64> {
        grid.displayed_row_at(self.last_row_index).map(RowNode::bottom)
    }
}

/// Simple in-memory grid with uniform paging, handy for hosts without their own
/// pagination and for tests.
#[derive(Debug, Clone, Default)]
pub struct VecGrid {
    rows: Vec<RowNode>,
    page_size: usize,
    current_page: usize,
}

impl VecGrid {
    /// Build a grid from row heights laid out top to bottom
    pub fn from_heights(rows: &[(&str, i64, f64)], page_size: usize) -> Self {
        let mut top = 0.0;
        let rows = rows
            .iter()
            .map(|(id, order, height)| {
                let row = RowNode::new(*id, *order, top, *height);
                top += height;
                row
            })
            .collect();

        Self {
            rows,
            page_size: page_size.max(1),
            current_page: 0,
        }
    }

    /// Build a grid from rows that already carry their geometry
    pub fn from_rows(rows: Vec<RowNode>, page_size: usize) -> Self {
        Self {
            rows,
            page_size: page_size.max(1),
            current_page: 0,
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.min(self.total_pages().saturating_sub(1));
    }
}

impl RowGrid for VecGrid {
    fn displayed_row_count(&self) -> usize {
        self.rows.len()
    }

    fn displayed_row_at(&self, index: usize) -> Option<&RowNode> {
        self.rows.get(index)
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn current_page(&self) -> usize {
        self.current_page
    }

    fn total_pages(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }

    fn go_to_previous_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1);
    }

    fn go_to_next_page(&mut self) {
        if self.current_page + 1 < self.total_pages() {
            self.current_page += 1;
        }
    }

    fn for_each_row_in_display_order(&self, visitor: &mut dyn FnMut(usize, &RowNode)) {
        for (index, row) in self.rows.iter().enumerate() {
            visitor(index, row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_clamps_last_index_to_row_count() {
        let mut grid = VecGrid::from_heights(
            &[("a", 1, 40.0), ("b", 2, 40.0), ("c", 3, 40.0), ("d", 4, 40.0), ("e", 5, 40.0)],
            2,
        );
        grid.set_page(2);

        let window = PageWindow::of(&grid).unwrap();
        assert_eq!(window.first_row_index, 4);
        assert_eq!(window.last_row_index, 4);
        assert_eq!(window.row_top(&grid), Some(160.0));
        assert_eq!(window.row_bottom(&grid), Some(200.0));
    }

    #[test]
    fn empty_grid_has_no_page_window() {
        let grid = VecGrid::from_heights(&[], 10);
        assert!(PageWindow::of(&grid).is_none());
        assert_eq!(grid.total_pages(), 1);
    }

    #[test]
    fn paging_stops_at_both_ends() {
        let mut grid = VecGrid::from_heights(&[("a", 1, 1.0), ("b", 2, 1.0), ("c", 3, 1.0)], 2);
        grid.go_to_previous_page();
        assert_eq!(grid.current_page(), 0);
        grid.go_to_next_page();
        grid.go_to_next_page();
        assert_eq!(grid.current_page(), 1);
    }
}
