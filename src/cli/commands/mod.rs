pub mod enqueue;
pub mod history;
pub mod lookup;
pub mod params;
pub mod queue;
pub mod settings;
pub mod task;

pub use enqueue::{EnqueueCommands, enqueue_command};
pub use history::{HistoryCommands, history_command};
pub use lookup::{checkpoints_command, samplers_command};
pub use queue::{QueueCommands, queue_command};
pub use settings::{ConfigCommands, config_command};
pub use task::{TaskCommands, task_command};
