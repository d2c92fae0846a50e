//! Client for the agent scheduler HTTP API
//!
//! The scheduler runs inside the image generation web UI and exposes its queue
//! under a route prefix. Reads are retried on transient failures; mutations are
//! sent once and report their outcome through [`ResponseStatus`].

pub mod client;
pub mod constants;
pub mod models;
pub mod resilience;

pub use client::SchedulerClient;
pub use models::{
    HistoryFilter, HistoryResponse, QueueStatusResponse, ResponseStatus, Task, TaskKind,
    TaskPosition, TaskStatus, UpdateTaskArgs,
};
pub use resilience::{RetryConfig, RetryPolicy, RetryableError};
