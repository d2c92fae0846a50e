//! Drag-to-reorder engine for the paginated task queue
//!
//! Resolves a vertical pointer position to a target row, decides whether a drop
//! lands above or below it, flips pages when the pointer rests against a page
//! edge, and turns the final drop into a single move request.

pub mod commit;
pub mod grid;
pub mod resolve;
pub mod session;

pub use commit::{MoveRequest, MoveTarget, TaskMover, dispatch_move, plan_move, plan_step};
pub use grid::{PageWindow, RowGrid, RowNode, VecGrid};
pub use resolve::{HighlightPosition, highlight_position, pixel_on_row, row_at_pixel};
pub use session::{DragConfig, Highlight, PageDirection, ReorderEngine};
