pub mod output;
pub mod spinner;

pub use output::{confirm, print_task, report, status_label, truncate};
pub use spinner::{Spinner, with_spinner};
