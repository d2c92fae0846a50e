//! Routes and defaults for the scheduler HTTP API

/// Default server address of the web UI hosting the scheduler
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:7860";

/// Default mount point of the scheduler routes
pub const DEFAULT_API_PREFIX: &str = "/agent-scheduler/v1";

pub const USER_AGENT: &str = concat!("agent-scheduler/", env!("CARGO_PKG_VERSION"));

/// Standard headers
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    pub const ACCEPT_ZIP: &str = "application/zip";
}

/// Join the server url and api prefix without doubling slashes
pub fn api_base(server_url: &str, api_prefix: &str) -> String {
    let prefix = api_prefix.trim_matches('/');
    if prefix.is_empty() {
        server_url.trim_end_matches('/').to_string()
    } else {
        format!("{}/{}", server_url.trim_end_matches('/'), prefix)
    }
}

/// Routes relative to the api base
pub mod routes {
    use urlencoding::encode;

    pub const QUEUE: &str = "queue";
    pub const QUEUE_PAUSE: &str = "queue/pause";
    pub const QUEUE_RESUME: &str = "queue/resume";
    pub const QUEUE_CLEAR: &str = "queue/clear";
    pub const HISTORY: &str = "history";
    pub const HISTORY_CLEAR: &str = "history/clear";
    pub const REQUEUE_FAILED: &str = "task/requeue-failed";
    pub const EXPORT: &str = "export";
    pub const IMPORT: &str = "import";
    pub const SAMPLERS: &str = "samplers";
    pub const SD_MODELS: &str = "sd-models";

    pub fn task(id: &str) -> String {
        format!("task/{}", encode(id))
    }

    /// `task/{id}/{action}` for run, requeue, position, bookmark and friends
    pub fn task_action(id: &str, action: &str) -> String {
        format!("task/{}/{}", encode(id), action)
    }

    pub fn task_move(id: &str, target: &str) -> String {
        format!("task/{}/move/{}", encode(id), encode(target))
    }

    pub fn enqueue(kind: &str) -> String {
        format!("queue/{}", kind)
    }
}
