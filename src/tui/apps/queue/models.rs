//! Data models for the queue panel

use std::time::{Duration, Instant};

use crate::api::{ResponseStatus, SchedulerClient, TaskStatus};

/// Which list the panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Pending,
    History,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::History => "History",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Pending => Self::History,
            Self::History => Self::Pending,
        }
    }
}

/// How a tab orders its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Priority ascending, the execution order
    Queue,
    /// Bookmarked first, then newest priority first
    History,
}

pub fn status_symbol(status: TaskStatus, is_current: bool) -> &'static str {
    if is_current {
        return "▶";
    }
    match status {
        TaskStatus::Pending => "·",
        TaskStatus::Running => "▶",
        TaskStatus::Done => "✓",
        TaskStatus::Failed => "⚠",
        TaskStatus::Interrupted => "■",
        TaskStatus::Saved => "◆",
    }
}

/// Transient notification shown in the corner
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub success: bool,
    pub expires_at: Instant,
}

impl Toast {
    pub fn from_status(status: &ResponseStatus, now: Instant, duration: Duration) -> Self {
        Self {
            message: status.message.clone(),
            success: status.success,
            expires_at: now + duration,
        }
    }
}

/// Modal input line at the bottom of the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Search,
    Rename { task_id: String },
    ConfirmClear(Tab),
}

/// Delay before re-reading the queue after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshAfter {
    Now,
    /// The scheduler applies pause, resume and run asynchronously
    Settle,
}

impl RefreshAfter {
    pub fn delay(&self) -> Duration {
        match self {
            Self::Now => Duration::ZERO,
            Self::Settle => Duration::from_millis(500),
        }
    }
}

/// Mutating request issued from the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    Run(String),
    Requeue(String),
    Delete(String),
    Pause,
    Resume,
    ClearQueue,
    ClearHistory,
    RequeueFailed,
    Bookmark { task_id: String, bookmarked: bool },
    Rename { task_id: String, name: String },
}

impl TaskAction {
    pub fn refresh_after(&self) -> RefreshAfter {
        match self {
            Self::Run(_) | Self::Pause | Self::Resume => RefreshAfter::Settle,
            _ => RefreshAfter::Now,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Run(id) => format!("run task {}", id),
            Self::Requeue(id) => format!("requeue task {}", id),
            Self::Delete(id) => format!("delete task {}", id),
            Self::Pause => "pause the queue".to_string(),
            Self::Resume => "resume the queue".to_string(),
            Self::ClearQueue => "clear the queue".to_string(),
            Self::ClearHistory => "clear the history".to_string(),
            Self::RequeueFailed => "requeue failed tasks".to_string(),
            Self::Bookmark { task_id, bookmarked: true } => format!("bookmark task {}", task_id),
            Self::Bookmark { task_id, bookmarked: false } => format!("unbookmark task {}", task_id),
            Self::Rename { task_id, .. } => format!("rename task {}", task_id),
        }
    }

    pub async fn execute(self, client: &SchedulerClient) -> anyhow::Result<ResponseStatus> {
        match self {
            Self::Run(id) => client.run_task(&id).await,
            Self::Requeue(id) => client.requeue_task(&id).await,
            Self::Delete(id) => client.delete_task(&id).await,
            Self::Pause => client.pause_queue().await,
            Self::Resume => client.resume_queue().await,
            Self::ClearQueue => client.clear_queue().await,
            Self::ClearHistory => client.clear_history().await,
            Self::RequeueFailed => client.requeue_failed().await,
            Self::Bookmark { task_id, bookmarked } => client.set_bookmark(&task_id, bookmarked).await,
            Self::Rename { task_id, name } => client.rename_task(&task_id, &name).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_state_changes_settle_before_refresh() {
        assert_eq!(TaskAction::Pause.refresh_after().delay(), Duration::from_millis(500));
        assert_eq!(TaskAction::Run("t".into()).refresh_after(), RefreshAfter::Settle);
        assert_eq!(TaskAction::Delete("t".into()).refresh_after(), RefreshAfter::Now);
    }

    #[test]
    fn toast_expires_after_duration() {
        let now = Instant::now();
        let toast = Toast::from_status(
            &ResponseStatus::failure("Task not found"),
            now,
            Duration::from_millis(3000),
        );
        assert!(!toast.success);
        assert_eq!(toast.expires_at - now, Duration::from_millis(3000));
    }
}
