//! Terminal client for the Stable Diffusion agent scheduler
//!
//! The [`reorder`] engine turns pointer drags over a paginated, sorted task
//! table into move requests. [`tui`] hosts it in a full-screen queue panel and
//! [`cli`] exposes the rest of the scheduler API as commands.

pub mod api;
pub mod cli;
pub mod config;
pub mod reorder;
pub mod tui;
