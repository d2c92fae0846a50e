use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use super::constants::{self, headers, routes};
use super::models::{
    DataResponse, EnqueueResponse, HistoryFilter, HistoryResponse, ImportRequest,
    QueueStatusResponse, ResponseStatus, Task, TaskKind, TaskPosition, UpdateTaskArgs,
};
use super::resilience::{RetryConfig, RetryPolicy};
use crate::config::ServerConfig;
use crate::reorder::{MoveRequest, MoveTarget, TaskMover};

#[derive(Debug, Clone)]
struct BasicAuth {
    username: String,
    password: Option<String>,
}

/// HTTP client for the scheduler API with connection pooling
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    base_url: String,
    http_client: reqwest::Client,
    auth: Option<BasicAuth>,
    retry_policy: RetryPolicy,
}

impl SchedulerClient {
    pub fn new(server: &ServerConfig) -> anyhow::Result<Self> {
        Self::with_retry_policy(server, RetryConfig::default())
    }

    /// Create a client with a custom retry policy for reads
    pub fn with_retry_policy(server: &ServerConfig, retry_config: RetryConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(server.timeout_secs.max(1)))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(constants::USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        let auth = server.username.as_ref().map(|username| BasicAuth {
            username: username.clone(),
            password: server.password.clone(),
        });

        Ok(Self {
            base_url: constants::api_base(&server.url, &server.api_prefix),
            http_client,
            auth,
            retry_policy: RetryPolicy::new(retry_config),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route)
    }

    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, self.url(route))
            .header("Accept", headers::CONTENT_TYPE_JSON);
        match &self.auth {
            Some(auth) => builder.basic_auth(&auth.username, auth.password.as_ref()),
            None => builder,
        }
    }

    /// GET with retries, decoding the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        route: &str,
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let request_id = Uuid::new_v4();
        debug!("[{}] GET {}", request_id, self.url(route));

        let response = self
            .retry_policy
            .execute(|| async {
                self.request(Method::GET, route)
                    .query(query)
                    .send()
                    .await?
                    .error_for_status()
            })
            .await
            .with_context(|| format!("GET {} failed", route))?;

        debug!("[{}] {}", request_id, response.status());
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response of GET {}", route))
    }

    /// Send a mutation once and decode the reply
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder, label: &str) -> anyhow::Result<T> {
        let request_id = Uuid::new_v4();
        debug!("[{}] {}", request_id, label);

        let response: Response = builder
            .send()
            .await
            .with_context(|| format!("{} failed", label))?
            .error_for_status()
            .with_context(|| format!("{} was rejected", label))?;

        debug!("[{}] {}", request_id, response.status());
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response of {}", label))
    }

    async fn post_status(&self, route: &str) -> anyhow::Result<ResponseStatus> {
        self.send_json(self.request(Method::POST, route), &format!("POST {}", route))
            .await
    }

    // Queue

    pub async fn queue_status(&self, limit: usize, offset: usize) -> anyhow::Result<QueueStatusResponse> {
        self.get_json(
            routes::QUEUE,
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    pub async fn pause_queue(&self) -> anyhow::Result<ResponseStatus> {
        self.post_status(routes::QUEUE_PAUSE).await
    }

    pub async fn resume_queue(&self) -> anyhow::Result<ResponseStatus> {
        self.post_status(routes::QUEUE_RESUME).await
    }

    pub async fn clear_queue(&self) -> anyhow::Result<ResponseStatus> {
        self.post_status(routes::QUEUE_CLEAR).await
    }

    /// Pending tasks as a JSON array suitable for [`Self::import_queue`]
    pub async fn export_queue(&self) -> anyhow::Result<Value> {
        self.get_json(routes::EXPORT, &[]).await
    }

    pub async fn import_queue(&self, content: String) -> anyhow::Result<ResponseStatus> {
        let builder = self
            .request(Method::POST, routes::IMPORT)
            .json(&ImportRequest { content });
        self.send_json(builder, "POST import").await
    }

    pub async fn enqueue<B: Serialize + ?Sized>(&self, kind: TaskKind, body: &B) -> anyhow::Result<EnqueueResponse> {
        let route = routes::enqueue(kind.as_str());
        let builder = self.request(Method::POST, &route).json(body);
        self.send_json(builder, &format!("POST {}", route)).await
    }

    // History

    pub async fn history(
        &self,
        filter: HistoryFilter,
        limit: usize,
        offset: usize,
    ) -> anyhow::Result<HistoryResponse> {
        self.get_json(
            routes::HISTORY,
            &[
                ("status", filter.as_str().to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        )
        .await
    }

    pub async fn clear_history(&self) -> anyhow::Result<ResponseStatus> {
        self.post_status(routes::HISTORY_CLEAR).await
    }

    pub async fn requeue_failed(&self) -> anyhow::Result<ResponseStatus> {
        self.post_status(routes::REQUEUE_FAILED).await
    }

    // Single task

    pub async fn get_task(&self, id: &str) -> anyhow::Result<Task> {
        let reply: DataResponse<Task> = self.get_json(&routes::task(id), &[]).await?;
        reply.into_data()
    }

    pub async fn task_position(&self, id: &str) -> anyhow::Result<TaskPosition> {
        let reply: DataResponse<TaskPosition> = self
            .get_json(&routes::task_action(id, "position"), &[])
            .await?;
        reply.into_data()
    }

    pub async fn update_task(&self, id: &str, args: &UpdateTaskArgs) -> anyhow::Result<ResponseStatus> {
        let builder = self.request(Method::PUT, &routes::task(id)).json(args);
        self.send_json(builder, &format!("PUT task {}", id)).await
    }

    pub async fn run_task(&self, id: &str) -> anyhow::Result<ResponseStatus> {
        self.post_status(&routes::task_action(id, "run")).await
    }

    pub async fn requeue_task(&self, id: &str) -> anyhow::Result<ResponseStatus> {
        self.post_status(&routes::task_action(id, "requeue")).await
    }

    /// Delete a task, interrupting it first if it is running
    pub async fn delete_task(&self, id: &str) -> anyhow::Result<ResponseStatus> {
        let route = routes::task(id);
        self.send_json(self.request(Method::DELETE, &route), &format!("DELETE {}", route))
            .await
    }

    pub async fn move_task_to(&self, id: &str, target: &MoveTarget) -> anyhow::Result<ResponseStatus> {
        self.post_status(&routes::task_move(id, target.path_segment()))
            .await
    }

    pub async fn set_bookmark(&self, id: &str, bookmarked: bool) -> anyhow::Result<ResponseStatus> {
        let action = if bookmarked { "bookmark" } else { "unbookmark" };
        self.post_status(&routes::task_action(id, action)).await
    }

    pub async fn rename_task(&self, id: &str, name: &str) -> anyhow::Result<ResponseStatus> {
        let route = routes::task_action(id, "rename");
        let builder = self
            .request(Method::POST, &route)
            .query(&[("name", name)]);
        self.send_json(builder, &format!("POST {}", route)).await
    }

    /// Zip archive with the task's images.
    ///
    /// The server answers with a JSON failure instead of a zip when the task
    /// has no results, which is surfaced as an error carrying its message.
    pub async fn download_results(&self, id: &str) -> anyhow::Result<Vec<u8>> {
        let route = routes::task_action(id, "results");
        let response = self
            .request(Method::GET, &route)
            .header("Accept", headers::ACCEPT_ZIP)
            .query(&[("zip", "true")])
            .send()
            .await
            .with_context(|| format!("GET {} failed", route))?
            .error_for_status()
            .with_context(|| format!("GET {} was rejected", route))?;

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(headers::CONTENT_TYPE_JSON));

        if is_json {
            let status: ResponseStatus = response
                .json()
                .await
                .context("Failed to decode results reply")?;
            anyhow::bail!(status.message);
        }

        let bytes = response.bytes().await.context("Failed to read results archive")?;
        Ok(bytes.to_vec())
    }

    // Lookups

    pub async fn samplers(&self) -> anyhow::Result<Vec<String>> {
        self.get_json(routes::SAMPLERS, &[]).await
    }

    pub async fn checkpoints(&self) -> anyhow::Result<Vec<String>> {
        self.get_json(routes::SD_MODELS, &[]).await
    }
}

#[async_trait]
impl TaskMover for SchedulerClient {
    async fn move_task(&self, request: &MoveRequest) -> anyhow::Result<ResponseStatus> {
        self.move_task_to(&request.task_id, &request.target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(username: Option<&str>) -> ServerConfig {
        ServerConfig {
            url: "http://localhost:7860/".to_string(),
            api_prefix: "/agent-scheduler/v1".to_string(),
            username: username.map(str::to_string),
            password: Some("secret".to_string()),
            timeout_secs: 5,
        }
    }

    #[test]
    fn builds_base_url_from_server_settings() {
        let client = SchedulerClient::new(&server(None)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:7860/agent-scheduler/v1");
        assert_eq!(client.url(routes::QUEUE), "http://localhost:7860/agent-scheduler/v1/queue");
    }

    #[test]
    fn basic_auth_only_applies_with_a_username() {
        let anonymous = SchedulerClient::new(&server(None)).unwrap();
        let request = anonymous.request(Method::GET, routes::QUEUE).build().unwrap();
        assert!(request.headers().get("authorization").is_none());

        let authed = SchedulerClient::new(&server(Some("admin"))).unwrap();
        let request = authed.request(Method::GET, routes::QUEUE).build().unwrap();
        let value = request.headers().get("authorization").unwrap().to_str().unwrap();
        assert!(value.starts_with("Basic "));
    }
}
