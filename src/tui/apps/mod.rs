pub mod queue;

pub use queue::{QueueApp, QueueAppParams};
