//! Full-screen terminal UI
//!
//! Elm-style: apps own their state, turn messages into commands, and declare
//! the inputs they want. The [`Runtime`] routes crossterm events and spawned
//! async results back into the app once per frame.

pub mod app;
pub mod apps;
pub mod command;
pub mod runtime;
pub mod subscription;
pub mod theme;

pub use app::App;
pub use command::Command;
pub use runtime::Runtime;
pub use subscription::Subscription;
pub use theme::Theme;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::SchedulerClient;
use crate::config::UiConfig;
use apps::{QueueApp, QueueAppParams};

const FRAME: Duration = Duration::from_millis(16);

/// Launch the queue panel and block until the user quits
pub async fn launch(client: Arc<SchedulerClient>, ui: UiConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("Starting queue panel against {}", client.base_url());
    let mut runtime = Runtime::<QueueApp>::new(QueueAppParams { client, ui });

    let result = run(&mut terminal, &mut runtime).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn run<B: Backend, A: App>(terminal: &mut Terminal<B>, runtime: &mut Runtime<A>) -> Result<()> {
    loop {
        let frame_start = Instant::now();

        // Process all pending events first for minimal input latency
        while event::poll(Duration::from_millis(0))? {
            let keep_running = match event::read()? {
                Event::Key(key) => runtime.handle_key(key)?,
                Event::Mouse(mouse) => runtime.handle_mouse(mouse)?,
                _ => true,
            };
            if !keep_running {
                return Ok(());
            }
        }

        // Timers first so an expired page-advance lands in this frame
        if !runtime.poll_timers()? || !runtime.poll_async()? {
            return Ok(());
        }

        terminal.draw(|frame| runtime.render(frame))?;

        if let Some(remaining) = FRAME.checked_sub(frame_start.elapsed()) {
            tokio::time::sleep(remaining).await;
        }
    }
}
