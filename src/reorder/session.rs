//! Drag session state machine
//!
//! One gesture at a time: `Idle` (no session) -> `Dragging` -> `Idle`. While
//! dragging, at most one row is highlighted and at most one page-advance timer
//! is armed. The host loop owns the clock and passes `Instant`s in, then calls
//! [`ReorderEngine::poll_timer`] every frame to let an armed timer fire.

use log::{debug, info};
use std::time::{Duration, Instant};

use super::commit::{MoveRequest, plan_move};
use super::grid::{PageWindow, RowGrid};
use super::resolve::{HighlightPosition, display_index_of, highlight_position, pixel_on_row, row_at_pixel};

/// Tuning for the drag interaction
#[derive(Debug, Clone)]
pub struct DragConfig {
    /// How long the pointer must rest against a page edge before the page flips
    pub page_advance_delay: Duration,
    /// Nominal row height of the grid; half of it is the edge margin
    pub default_row_height: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            page_advance_delay: Duration::from_millis(1500),
            default_row_height: 2.0, // terminal lines
        }
    }
}

impl DragConfig {
    pub fn edge_margin(&self) -> f64 {
        self.default_row_height / 2.0
    }
}

/// Current drop target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub row_id: String,
    pub position: HighlightPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy)]
struct ArmedAdvance {
    direction: PageDirection,
    deadline: Instant,
}

#[derive(Debug)]
struct DragSession {
    dragged_id: String,
    last_pixel: Option<f64>,
    highlight: Option<Highlight>,
    page_advance: Option<ArmedAdvance>,
}

impl DragSession {
    fn clear_highlight(&mut self) {
        self.highlight = None;
        self.disarm();
    }

    fn disarm(&mut self) {
        if self.page_advance.take().is_some() {
            debug!("Disarmed page advance timer");
        }
    }

    fn arm(&mut self, direction: PageDirection, now: Instant, delay: Duration) {
        // Re-arming never pushes the deadline back
        if self.page_advance.is_some() {
            return;
        }
        debug!("Armed page advance timer ({:?})", direction);
        self.page_advance = Some(ArmedAdvance {
            direction,
            deadline: now + delay,
        });
    }
}

/// Drag-to-reorder engine for a paginated, ordered task grid
#[derive(Debug, Default)]
pub struct ReorderEngine {
    config: DragConfig,
    session: Option<DragSession>,
}

impl ReorderEngine {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn dragged_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.dragged_id.as_str())
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.session.as_ref().and_then(|s| s.highlight.as_ref())
    }

    pub fn last_pixel(&self) -> Option<f64> {
        self.session.as_ref().and_then(|s| s.last_pixel)
    }

    /// Direction of the armed page-advance timer, if any
    pub fn armed_direction(&self) -> Option<PageDirection> {
        self.session
            .as_ref()
            .and_then(|s| s.page_advance)
            .map(|armed| armed.direction)
    }

    /// Pointer entered the list, starting a session if none is running
    pub fn drag_enter<G: RowGrid + ?Sized>(
        &mut self,
        grid: &G,
        dragged_id: &str,
        pixel: f64,
        now: Instant,
    ) {
        if self.session.is_none() {
            debug!("Drag started for task {}", dragged_id);
            self.session = Some(DragSession {
                dragged_id: dragged_id.to_string(),
                last_pixel: None,
                highlight: None,
                page_advance: None,
            });
        }
        self.track(grid, pixel, now);
    }

    /// New pointer sample while dragging. Ignored when idle.
    pub fn drag_move<G: RowGrid + ?Sized>(&mut self, grid: &G, pixel: f64, now: Instant) {
        if self.session.is_none() {
            return;
        }
        self.track(grid, pixel, now);
    }

    /// Pointer left the list. The session survives with its last pixel.
    pub fn drag_leave(&mut self) {
        if let Some(session) = self.session.as_mut() {
            debug!("Drag left the list");
            session.clear_highlight();
        }
    }

    /// Drag released. Returns the move to issue, if the drop changes the order.
    ///
    /// The session is cleared whatever the outcome.
    pub fn drag_end<G: RowGrid + ?Sized>(&mut self, grid: &G, dragged_id: &str) -> Option<MoveRequest> {
        let session = self.session.take()?;
        let highlight = session.highlight?;

        if highlight.row_id == dragged_id {
            debug!("Dropped task {} onto itself", dragged_id);
            return None;
        }

        let request = plan_move(grid, dragged_id, &highlight.row_id, highlight.position);
        match &request {
            Some(request) => info!(
                "Moving task {} to {}",
                request.task_id,
                request.target.describe()
            ),
            None => debug!("Drop of task {} keeps its position", dragged_id),
        }
        request
    }

    /// Abort the gesture without moving anything
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            debug!("Drag cancelled");
        }
    }

    /// Fire the page-advance timer if its deadline has passed.
    ///
    /// Returns true when the grid changed page.
    pub fn poll_timer<G: RowGrid + ?Sized>(&mut self, grid: &mut G, now: Instant) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(armed) = session.page_advance else {
            return false;
        };
        if now < armed.deadline {
            return false;
        }

        if session.highlight.is_none() {
            session.page_advance = None;
            return false;
        }
        let last_pixel = session.last_pixel;

        let moved = match armed.direction {
            PageDirection::Previous if grid.current_page() > 0 => {
                grid.go_to_previous_page();
                true
            }
            PageDirection::Next if grid.current_page() + 1 < grid.total_pages() => {
                grid.go_to_next_page();
                true
            }
            _ => false,
        };

        if moved {
            info!("Drag paged {:?} to page {}", armed.direction, grid.current_page() + 1);
            if let Some(pixel) = last_pixel {
                self.track(&*grid, pixel, now);
            }
        }

        // Only a fresh pointer sample may arm the next flip
        if let Some(session) = self.session.as_mut() {
            session.page_advance = None;
        }
        moved
    }

    fn track<G: RowGrid + ?Sized>(&mut self, grid: &G, pixel: f64, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.last_pixel = Some(pixel);

        let Some(row) = row_at_pixel(grid, pixel) else {
            session.clear_highlight();
            return;
        };
        let position = highlight_position(grid, row, pixel);

        match session.highlight.as_mut() {
            Some(current) if current.row_id == row.id => current.position = position,
            _ => {
                session.clear_highlight();
                session.highlight = Some(Highlight {
                    row_id: row.id.clone(),
                    position,
                });
            }
        }

        Self::evaluate_page_advance(session, &self.config, grid, pixel, now);
    }

    fn evaluate_page_advance<G: RowGrid + ?Sized>(
        session: &mut DragSession,
        config: &DragConfig,
        grid: &G,
        pixel: f64,
        now: Instant,
    ) {
        let Some(row_id) = session.highlight.as_ref().map(|h| h.row_id.clone()) else {
            session.disarm();
            return;
        };
        let (Some(window), Some(index)) = (PageWindow::of(grid), display_index_of(grid, &row_id)) else {
            session.disarm();
            return;
        };
        let Some(row) = grid.displayed_row_at(index) else {
            session.disarm();
            return;
        };

        let offset = pixel_on_row(grid, row, pixel);
        let margin = config.edge_margin();

        if index == window.first_row_index {
            if offset > margin {
                session.disarm();
                return;
            }
            session.arm(PageDirection::Previous, now, config.page_advance_delay);
        } else if index == window.last_row_index {
            if row.height - offset > margin {
                session.disarm();
                return;
            }
            session.arm(PageDirection::Next, now, config.page_advance_delay);
        } else {
            session.disarm();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::commit::MoveTarget;
    use crate::reorder::grid::VecGrid;

    fn engine() -> ReorderEngine {
        ReorderEngine::new(DragConfig {
            page_advance_delay: Duration::from_millis(1500),
            default_row_height: 40.0,
        })
    }

    fn abc() -> VecGrid {
        VecGrid::from_heights(&[("a", 1, 40.0), ("b", 2, 40.0), ("c", 3, 40.0)], 10)
    }

    #[test]
    fn move_switches_highlight_between_rows() {
        let grid = abc();
        let mut engine = engine();
        let now = Instant::now();

        engine.drag_enter(&grid, "a", 50.0, now);
        assert_eq!(engine.highlight().unwrap().row_id, "b");
        assert_eq!(engine.highlight().unwrap().position, HighlightPosition::Above);

        engine.drag_move(&grid, 70.0, now);
        assert_eq!(engine.highlight().unwrap().row_id, "b");
        assert_eq!(engine.highlight().unwrap().position, HighlightPosition::Below);

        engine.drag_move(&grid, 90.0, now);
        assert_eq!(engine.highlight().unwrap().row_id, "c");
    }

    #[test]
    fn moving_into_padding_clears_highlight_but_keeps_session() {
        let grid = abc();
        let mut engine = engine();
        let now = Instant::now();

        engine.drag_enter(&grid, "a", 50.0, now);
        engine.drag_move(&grid, 300.0, now);
        assert!(engine.is_dragging());
        assert!(engine.highlight().is_none());
        assert_eq!(engine.last_pixel(), Some(300.0));
    }

    #[test]
    fn leave_keeps_last_pixel() {
        let grid = abc();
        let mut engine = engine();
        let now = Instant::now();

        engine.drag_enter(&grid, "a", 50.0, now);
        engine.drag_leave();
        assert!(engine.highlight().is_none());
        assert_eq!(engine.last_pixel(), Some(50.0));
        assert!(engine.is_dragging());
    }

    #[test]
    fn move_while_idle_is_ignored() {
        let grid = abc();
        let mut engine = engine();
        engine.drag_move(&grid, 50.0, Instant::now());
        assert!(!engine.is_dragging());
        assert!(engine.highlight().is_none());
    }

    #[test]
    fn end_issues_move_and_clears_session() {
        let grid = abc();
        let mut engine = engine();
        let now = Instant::now();

        engine.drag_enter(&grid, "c", 10.0, now);
        let request = engine.drag_end(&grid, "c").unwrap();
        assert_eq!(request.task_id, "c");
        assert_eq!(request.target, MoveTarget::Before("a".to_string()));
        assert!(!engine.is_dragging());
    }

    #[test]
    fn cancel_drops_everything() {
        let grid = abc();
        let mut engine = engine();
        let now = Instant::now();

        engine.drag_enter(&grid, "c", 10.0, now);
        assert!(engine.armed_direction().is_some());
        engine.cancel();
        assert!(!engine.is_dragging());
        assert!(engine.drag_end(&grid, "c").is_none());
    }

    #[test]
    fn dropping_onto_dragged_row_is_a_no_op() {
        let grid = abc();
        let mut engine = engine();
        engine.drag_enter(&grid, "b", 50.0, Instant::now());
        assert!(engine.drag_end(&grid, "b").is_none());
    }

    #[test]
    fn page_flip_leaves_the_timer_disarmed() {
        let mut grid = VecGrid::from_heights(
            &[("a", 1, 40.0), ("b", 2, 40.0), ("c", 3, 40.0), ("d", 4, 40.0), ("e", 5, 40.0)],
            2,
        );
        grid.set_page(2);
        let mut engine = engine();
        let t0 = Instant::now();

        engine.drag_enter(&grid, "e", 5.0, t0);
        assert!(engine.poll_timer(&mut grid, t0 + Duration::from_millis(1500)));
        assert_eq!(engine.highlight().unwrap().row_id, "c");
        assert!(engine.armed_direction().is_none());
    }

    #[test]
    fn middle_rows_never_arm_the_timer() {
        let grid = abc();
        let mut engine = engine();
        engine.drag_enter(&grid, "a", 41.0, Instant::now());
        assert_eq!(engine.highlight().unwrap().row_id, "b");
        assert!(engine.armed_direction().is_none());
    }
}
