//! Retry handling for transient failures of the scheduler API

pub mod retry;

pub use retry::{ClassifyError, RetryConfig, RetryPolicy, RetryableError};
