//! Wire models, configuration and command line parsing through the public API

use agent_scheduler::api::constants::{api_base, routes};
use agent_scheduler::api::{HistoryFilter, HistoryResponse, QueueStatusResponse, TaskStatus};
use agent_scheduler::cli::Cli;
use agent_scheduler::cli::app::Commands;
use agent_scheduler::config::Config;
use clap::Parser;
use serde_json::json;

#[test]
fn queue_snapshot_from_the_scheduler() {
    let payload = json!({
        "current_task_id": "t-running",
        "total_pending_tasks": 2,
        "paused": false,
        "pending_tasks": [
            {
                "id": "t-running",
                "api_task_id": null,
                "name": null,
                "type": "txt2img",
                "status": "running",
                "params": {"prompt": "a red fox", "steps": 25},
                "priority": 1700000000000i64,
                "result": null,
                "created_at": 1700000000000i64,
                "updated_at": 1700000005000i64
            },
            {
                "id": "t-next",
                "name": "Fox, wide",
                "type": "img2img",
                "status": "pending",
                "params": {"prompt": "a red fox, wide shot", "checkpoint": "sdxl.safetensors"},
                "priority": 1700000001000i64,
                "created_at": 1700000001000i64
            }
        ]
    });

    let snapshot: QueueStatusResponse = serde_json::from_value(payload).unwrap();
    assert_eq!(snapshot.current_task_id.as_deref(), Some("t-running"));
    assert_eq!(snapshot.pending_tasks.len(), 2);

    let next = &snapshot.pending_tasks[1];
    assert_eq!(next.display_name(), "Fox, wide");
    assert_eq!(next.status, TaskStatus::Pending);
    assert_eq!(next.checkpoint(), Some("sdxl.safetensors"));
    assert!(snapshot.pending_tasks[0].priority_key() < next.priority_key());
}

#[test]
fn history_page_with_bookmarks() {
    let payload = json!({
        "total": 3,
        "tasks": [
            {"id": "h1", "type": "txt2img", "status": "done", "params": {}, "bookmarked": true,
             "created_at": "2024-05-01T10:00:00"},
            {"id": "h2", "type": "txt2img", "status": "failed", "params": {}, "result": "CUDA out of memory"}
        ]
    });
    let history: HistoryResponse = serde_json::from_value(payload).unwrap();
    assert_eq!(history.total, 3);
    assert!(history.tasks[0].is_bookmarked());
    assert!(history.tasks[0].created_at.is_some());
    assert_eq!(history.tasks[1].status, TaskStatus::Failed);
}

#[test]
fn routes_hang_off_the_prefix() {
    let base = api_base("http://127.0.0.1:7860/", "/agent-scheduler/v1");
    assert_eq!(base, "http://127.0.0.1:7860/agent-scheduler/v1");
    assert_eq!(routes::task_move("t1", "bottom"), "task/t1/move/bottom");
    assert_eq!(routes::QUEUE_PAUSE, "queue/pause");
}

#[test]
fn ui_settings_drive_the_drag_engine() {
    let config: Config = toml::from_str(
        "[ui]\ndrag_page_delay_ms = 800\nrow_height = 9\n",
    )
    .unwrap();
    let drag = config.ui.drag_config();
    assert_eq!(drag.page_advance_delay.as_millis(), 800);
    // Row height is clamped to what the table can draw
    assert_eq!(config.ui.effective_row_height(), 3);
    assert_eq!(drag.edge_margin(), 1.5);
}

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("agent-scheduler").chain(args.iter().copied()))
}

#[test]
fn command_line_covers_the_scheduler() {
    assert!(matches!(parse(&["queue", "list"]).unwrap().command, Commands::Queue(_)));
    assert!(matches!(parse(&["history", "list", "--status", "failed"]).unwrap().command, Commands::History(_)));
    assert!(matches!(parse(&["task", "results", "t1", "-o", "out.zip"]).unwrap().command, Commands::Task(_)));
    assert!(matches!(
        parse(&["enqueue", "txt2img", "--prompt", "fox", "--seed", "-1"]).unwrap().command,
        Commands::Enqueue(_)
    ));
    assert!(matches!(parse(&["tui"]).unwrap().command, Commands::Tui));
    assert!(matches!(parse(&["config", "set-server", "http://gpu:7860"]).unwrap().command, Commands::Config(_)));

    let cli = parse(&["--server", "http://gpu:7860", "samplers"]).unwrap();
    assert_eq!(cli.server.as_deref(), Some("http://gpu:7860"));

    assert!(parse(&["history", "list", "--status", "bogus"]).is_err());
    assert!(parse(&["task", "results", "t1"]).is_err());
}

#[test]
fn history_filters_cycle_through_every_status() {
    let mut filter = HistoryFilter::All;
    let mut seen = Vec::new();
    for _ in 0..HistoryFilter::ALL.len() {
        seen.push(filter.as_str());
        filter = filter.next();
    }
    assert_eq!(filter, HistoryFilter::All);
    assert_eq!(seen, vec!["all", "bookmarked", "done", "failed", "interrupted"]);
}
