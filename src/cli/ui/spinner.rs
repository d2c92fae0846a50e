//! Progress indicator for slow requests

use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Animated spinner on stderr, cleared when dropped.
///
/// Does nothing when stderr is not a terminal, so piped output stays clean.
pub struct Spinner {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        if !io::stderr().is_terminal() {
            return Self { stop: None, task: None };
        }

        let (stop, stopped) = oneshot::channel();
        let task = tokio::spawn(animate(message.into(), stopped));
        Self {
            stop: Some(stop),
            task: Some(task),
        }
    }
}

async fn animate(message: String, mut stopped: oneshot::Receiver<()>) {
    let mut stderr = io::stderr();
    for frame in FRAMES.iter().cycle() {
        let _ = write!(stderr, "\r{} {}", frame, message);
        let _ = stderr.flush();
        tokio::select! {
            _ = tokio::time::sleep(FRAME_INTERVAL) => {}
            _ = &mut stopped => break,
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
            let mut stderr = io::stderr();
            let _ = write!(stderr, "\r\x1b[K");
            let _ = stderr.flush();
        }
    }
}

/// Await a future while a spinner runs
pub async fn with_spinner<F, T>(message: impl Into<String>, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let _spinner = Spinner::start(message);
    future.await
}
