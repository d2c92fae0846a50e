//! Turning a drop into a move request, and sending it

use async_trait::async_trait;
use log::error;

use super::grid::RowGrid;
use super::resolve::HighlightPosition;
use crate::api::models::ResponseStatus;

/// Where a task should be moved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveTarget {
    /// Just before the task with this id
    Before(String),
    /// Head of the queue
    Top,
    /// Tail of the queue
    Bottom,
}

impl MoveTarget {
    /// Path segment understood by the scheduler's move endpoint
    pub fn path_segment(&self) -> &str {
        match self {
            Self::Before(id) => id,
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Before(id) => format!("before {}", id),
            Self::Top => "the top".to_string(),
            Self::Bottom => "the end".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub task_id: String,
    pub target: MoveTarget,
}

impl MoveRequest {
    pub fn new(task_id: impl Into<String>, target: MoveTarget) -> Self {
        Self {
            task_id: task_id.into(),
            target,
        }
    }
}

/// Compute the move for dropping `dragged_id` above or below `target_id`.
///
/// Positions are taken from the full order-sorted row sequence, not the visible
/// page or the filtered rows. Returns `None` when either row is unknown or the drop would leave the
/// dragged row where it already is.
pub fn plan_move<G: RowGrid + ?Sized>(
    grid: &G,
    dragged_id: &str,
    target_id: &str,
    position: HighlightPosition,
) -> Option<MoveRequest> {
    let mut ordered: Vec<(String, i64)> = Vec::with_capacity(grid.displayed_row_count());
    grid.for_each_row_in_full_order(&mut |id, order| ordered.push((id.to_string(), order)));
    ordered.sort_by_key(|(_, order)| *order);

    let dragged_index = ordered.iter().position(|(id, _)| id == dragged_id)?;
    let mut insertion_index = ordered.iter().position(|(id, _)| id == target_id)?;
    if position == HighlightPosition::Below {
        insertion_index += 1;
    }

    if insertion_index == dragged_index || insertion_index == dragged_index + 1 {
        return None;
    }

    let target = match ordered.get(insertion_index) {
        Some((anchor_id, _)) => MoveTarget::Before(anchor_id.clone()),
        None => MoveTarget::Bottom,
    };
    Some(MoveRequest::new(dragged_id, target))
}

/// Move a row one slot up (`steps < 0`) or down (`steps > 0`) in display order
pub fn plan_step<G: RowGrid + ?Sized>(grid: &G, task_id: &str, steps: isize) -> Option<MoveRequest> {
    let mut ids: Vec<(String, i64)> = Vec::new();
    grid.for_each_row_in_display_order(&mut |_, row| ids.push((row.id.clone(), row.order)));
    ids.sort_by_key(|(_, order)| *order);

    let index = ids.iter().position(|(id, _)| id == task_id)?;
    let neighbour = index.checked_add_signed(steps).filter(|i| *i < ids.len())?;
    let position = if steps < 0 {
        HighlightPosition::Above
    } else {
        HighlightPosition::Below
    };
    plan_move(grid, task_id, &ids[neighbour].0, position)
}

/// Something that can persist a new queue position
#[async_trait]
pub trait TaskMover: Send + Sync {
    async fn move_task(&self, request: &MoveRequest) -> anyhow::Result<ResponseStatus>;
}

/// Send a move and fold transport errors into a failed status for the notifier.
///
/// Never retried: the next refresh shows the authoritative order either way.
pub async fn dispatch_move(mover: &dyn TaskMover, request: MoveRequest) -> ResponseStatus {
    match mover.move_task(&request).await {
        Ok(status) => status,
        Err(e) => {
            error!("Failed to move task {}: {:#}", request.task_id, e);
            ResponseStatus::failure(format!("Failed to move task: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::grid::{RowNode, VecGrid};

    fn abc() -> VecGrid {
        VecGrid::from_heights(&[("a", 1, 40.0), ("b", 2, 40.0), ("c", 3, 40.0)], 10)
    }

    #[test]
    fn dropping_right_after_itself_is_a_no_op() {
        let grid = abc();
        assert!(plan_move(&grid, "a", "b", HighlightPosition::Above).is_none());
        assert!(plan_move(&grid, "b", "a", HighlightPosition::Below).is_none());
        assert!(plan_move(&grid, "b", "c", HighlightPosition::Above).is_none());
    }

    #[test]
    fn dropping_above_first_row_anchors_on_it() {
        let grid = abc();
        assert_eq!(
            plan_move(&grid, "c", "a", HighlightPosition::Above),
            Some(MoveRequest::new("c", MoveTarget::Before("a".to_string())))
        );
    }

    #[test]
    fn dropping_below_last_row_goes_to_the_end() {
        let grid = abc();
        assert_eq!(
            plan_move(&grid, "a", "c", HighlightPosition::Below),
            Some(MoveRequest::new("a", MoveTarget::Bottom))
        );
    }

    #[test]
    fn order_key_wins_over_display_order() {
        // Displayed c, a, b but ordered a, b, c
        let grid = VecGrid::from_rows(
            vec![
                RowNode::new("c", 30, 0.0, 2.0),
                RowNode::new("a", 10, 2.0, 2.0),
                RowNode::new("b", 20, 4.0, 2.0),
            ],
            10,
        );
        assert_eq!(
            plan_move(&grid, "a", "b", HighlightPosition::Below),
            Some(MoveRequest::new("a", MoveTarget::Before("c".to_string())))
        );
    }

    #[test]
    fn unknown_rows_produce_nothing() {
        let grid = abc();
        assert!(plan_move(&grid, "zz", "a", HighlightPosition::Above).is_none());
        assert!(plan_move(&grid, "a", "zz", HighlightPosition::Above).is_none());
    }

    #[test]
    fn stepping_moves_one_slot() {
        let grid = abc();
        assert_eq!(
            plan_step(&grid, "b", -1),
            Some(MoveRequest::new("b", MoveTarget::Before("a".to_string())))
        );
        assert_eq!(
            plan_step(&grid, "b", 1),
            Some(MoveRequest::new("b", MoveTarget::Bottom))
        );
        assert_eq!(
            plan_step(&grid, "a", 1),
            Some(MoveRequest::new("a", MoveTarget::Before("c".to_string())))
        );
        assert!(plan_step(&grid, "a", -1).is_none());
        assert!(plan_step(&grid, "c", 1).is_none());
    }

    #[test]
    fn wire_segments() {
        assert_eq!(MoveTarget::Before("x1".into()).path_segment(), "x1");
        assert_eq!(MoveTarget::Top.path_segment(), "top");
        assert_eq!(MoveTarget::Bottom.path_segment(), "bottom");
    }
}
