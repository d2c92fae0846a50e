//! Queue panel: pending and history tabs with drag-to-reorder

pub mod app;
pub mod commands;
pub mod grid;
pub mod models;
pub mod views;

pub use app::{QueueApp, QueueAppParams};
pub use grid::TaskGrid;
