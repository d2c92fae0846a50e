//! Wire models for the scheduler HTTP API

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Lifecycle state of a queued task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Done,
    Failed,
    Interrupted,
    Saved,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Interrupted => "interrupted",
            Self::Saved => "saved",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub api_task_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// `txt2img` or `img2img`
    #[serde(rename = "type")]
    pub task_type: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub bookmarked: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Name if set, otherwise the id
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }

    pub fn is_bookmarked(&self) -> bool {
        self.bookmarked.unwrap_or(false)
    }

    pub fn priority_key(&self) -> i64 {
        self.priority.unwrap_or(0)
    }

    fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    pub fn prompt(&self) -> &str {
        self.param_str("prompt").unwrap_or("")
    }

    pub fn negative_prompt(&self) -> &str {
        self.param_str("negative_prompt").unwrap_or("")
    }

    pub fn checkpoint(&self) -> Option<&str> {
        self.param_str("checkpoint")
    }

    pub fn sampler(&self) -> Option<&str> {
        self.param_str("sampler_name")
            .or_else(|| self.param_str("sampler_index"))
    }

    pub fn steps(&self) -> Option<i64> {
        self.params.get("steps").and_then(Value::as_i64)
    }
}

/// Accepts epoch milliseconds (list endpoints) or an ISO-8601 string
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Float(f64),
        Text(String),
    }

    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    let parsed = match raw {
        None => None,
        Some(Raw::Millis(ms)) => Utc.timestamp_millis_opt(ms).single(),
        Some(Raw::Float(ms)) => Utc.timestamp_millis_opt(ms as i64).single(),
        Some(Raw::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                chrono::NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|naive| naive.and_utc())
            })
            .map_err(serde::de::Error::custom)
            .map(Some)?,
    };
    Ok(parsed)
}

/// Generic `{success, message}` reply used by every mutating endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl ResponseStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// `{success, message?, data?}` reply for endpoints that return a payload
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> DataResponse<T> {
    /// Payload, or the server's message as an error
    pub fn into_data(self) -> anyhow::Result<T> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(anyhow::anyhow!(
                self.message.unwrap_or_else(|| "Request failed".to_string())
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueStatusResponse {
    #[serde(default)]
    pub current_task_id: Option<String>,
    #[serde(default)]
    pub pending_tasks: Vec<Task>,
    #[serde(default)]
    pub total_pending_tasks: usize,
    #[serde(default)]
    pub paused: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub total: usize,
}

/// Status filter accepted by the history endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HistoryFilter {
    #[default]
    All,
    Bookmarked,
    Done,
    Failed,
    Interrupted,
}

impl HistoryFilter {
    pub const ALL: [HistoryFilter; 5] = [
        Self::All,
        Self::Bookmarked,
        Self::Done,
        Self::Failed,
        Self::Interrupted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Bookmarked => "bookmarked",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Interrupted => "interrupted",
        }
    }

    /// Next filter in the cycle used by the TUI
    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskPosition {
    pub status: TaskStatus,
    #[serde(default)]
    pub position: Option<usize>,
}

/// Body of `PUT /task/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTaskArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl UpdateTaskArgs {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.checkpoint.is_none()
            && self.params.as_ref().is_none_or(Map::is_empty)
    }
}

/// Reply of the enqueue endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct EnqueueResponse {
    pub task_id: String,
}

/// Which generation endpoint a new task goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Txt2Img,
    Img2Img,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Txt2Img => "txt2img",
            Self::Img2Img => "img2img",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRequest {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_accepts_millisecond_timestamps() {
        let task: Task = serde_json::from_value(json!({
            "id": "t1",
            "name": null,
            "type": "txt2img",
            "status": "pending",
            "params": {"prompt": "a cat", "steps": 20},
            "priority": 1700000000000i64,
            "created_at": 1700000000000i64
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.prompt(), "a cat");
        assert_eq!(task.steps(), Some(20));
        assert_eq!(task.display_name(), "t1");
        assert_eq!(task.created_at.unwrap().timestamp_millis(), 1_700_000_000_000);
        assert!(task.updated_at.is_none());
    }

    #[test]
    fn task_accepts_iso_timestamps() {
        let task: Task = serde_json::from_value(json!({
            "id": "t2",
            "type": "img2img",
            "status": "saved",
            "created_at": "2023-11-14T22:13:20Z",
            "updated_at": "2023-11-14T22:13:20.500"
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::Saved);
        assert_eq!(task.created_at.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(task.updated_at.unwrap().timestamp_millis(), 1_700_000_000_500);
    }

    #[test]
    fn failed_status_reply_is_not_an_error() {
        let status: ResponseStatus =
            serde_json::from_value(json!({"success": false, "message": "Task not found"})).unwrap();
        assert_eq!(status, ResponseStatus::failure("Task not found"));
    }

    #[test]
    fn data_reply_surfaces_server_message() {
        let reply: DataResponse<TaskPosition> =
            serde_json::from_value(json!({"success": false, "message": "Task not found"})).unwrap();
        assert_eq!(reply.into_data().unwrap_err().to_string(), "Task not found");
    }

    #[test]
    fn history_filter_cycles() {
        let mut filter = HistoryFilter::default();
        for _ in 0..HistoryFilter::ALL.len() {
            filter = filter.next();
        }
        assert_eq!(filter, HistoryFilter::All);
        assert_eq!(HistoryFilter::Bookmarked.as_str(), "bookmarked");
    }

    #[test]
    fn empty_update_skips_all_fields() {
        let args = UpdateTaskArgs::default();
        assert!(args.is_empty());
        assert_eq!(serde_json::to_value(&args).unwrap(), json!({}));
    }
}
