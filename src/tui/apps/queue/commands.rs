//! Command helpers for talking to the scheduler

use log::{error, warn};
use std::sync::Arc;

use super::app::Msg;
use super::models::{RefreshAfter, TaskAction};
use crate::api::{HistoryFilter, ResponseStatus, SchedulerClient};
use crate::reorder::{MoveRequest, dispatch_move};
use crate::tui::Command;

/// Everything the scheduler holds is fetched at once and paged locally
pub const QUEUE_FETCH_LIMIT: usize = 1000;
pub const HISTORY_FETCH_LIMIT: usize = 500;

pub fn load_queue(client: &Arc<SchedulerClient>) -> Command<Msg> {
    let client = Arc::clone(client);
    Command::perform(
        async move { client.queue_status(QUEUE_FETCH_LIMIT, 0).await },
        |result| {
            Msg::QueueLoaded(result.map_err(|e| {
                warn!("Failed to load queue: {:#}", e);
                format!("Failed to load queue: {}", e)
            }))
        },
    )
}

pub fn load_history(client: &Arc<SchedulerClient>, filter: HistoryFilter) -> Command<Msg> {
    let client = Arc::clone(client);
    Command::perform(
        async move { client.history(filter, HISTORY_FETCH_LIMIT, 0).await },
        |result| {
            Msg::HistoryLoaded(result.map_err(|e| {
                warn!("Failed to load history: {:#}", e);
                format!("Failed to load history: {}", e)
            }))
        },
    )
}

pub fn run_action(client: &Arc<SchedulerClient>, action: TaskAction) -> Command<Msg> {
    let client = Arc::clone(client);
    let refresh = action.refresh_after();
    let description = action.describe();
    Command::perform(
        async move {
            match action.execute(&client).await {
                Ok(status) => status,
                Err(e) => {
                    error!("Failed to {}: {:#}", description, e);
                    ResponseStatus::failure(format!("Failed to {}: {}", description, e))
                }
            }
        },
        move |status| Msg::ActionFinished(status, refresh),
    )
}

/// Send a reorder once. The refresh that follows shows the server's order either way.
pub fn move_task(client: &Arc<SchedulerClient>, request: MoveRequest) -> Command<Msg> {
    let client = Arc::clone(client);
    Command::perform(
        async move { dispatch_move(client.as_ref(), request).await },
        |status| Msg::ActionFinished(status, RefreshAfter::Now),
    )
}
